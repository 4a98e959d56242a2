use std::path::PathBuf;
use std::process::ExitCode;

use chrono::TimeDelta;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

use sat_track::config::{self, Config};
use sat_track::driver::{DriverError, FrameDriver, FrameStore, RunLog, RunSummary};
use sat_track::render::{FrameRenderer, SvgRenderer};
use sat_track::scan::{scan_span, ScanMode, ScanTiming, Sensor};
use sat_track::scene::DirectorySceneLoader;
use sat_track::trajectory::{self, TimeBounds, Trajectory, TrajectoryFormat};

#[derive(Parser)]
#[command(name = "sat-track")]
#[command(about = "Aircraft tracks over time-matched satellite imagery")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a trajectory against a sensor's scan schedule
    Validate(TrackArgs),
    /// Render one frame per resampled position
    Run(RunArgs),
}

#[derive(Args)]
struct TrackArgs {
    /// Trajectory file
    #[arg(long)]
    trajectory: PathBuf,
    #[arg(long, value_enum, default_value_t = TrajectoryFormat::Csv)]
    format: TrajectoryFormat,
    /// AHI, ABI, SEV, SEVN or AGR
    #[arg(long)]
    sensor: String,
    /// FD, MESO, CONUS, PACUS, M1, M2 or RSS
    #[arg(long, default_value = "FD")]
    mode: String,
    /// Drop positions before this time, YYYYmmddHHMM
    #[arg(long)]
    start: Option<String>,
    /// Drop positions after this time, YYYYmmddHHMM
    #[arg(long)]
    end: Option<String>,
    /// Time between frames
    #[arg(long, default_value = "30s")]
    cadence: String,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    track: TrackArgs,
    /// Directory holding the satellite files
    #[arg(long)]
    sat_dir: PathBuf,
    #[arg(long)]
    out_dir: PathBuf,
    /// Label used in frame file names
    #[arg(long)]
    tag: String,
    /// YAML style and margin settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Draw only the current position, framed around the mean position
    #[arg(long)]
    single_point: bool,
}

struct Track {
    timing: ScanTiming,
    trajectory: Trajectory,
    cadence: TimeDelta,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Validate(args) => validate(&args),
        Commands::Run(args) => run(&args),
    }
}

fn validate(args: &TrackArgs) -> ExitCode {
    let track = match load_track(args) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let resampled = match trajectory::resample(&track.trajectory, track.cadence) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let first = track.trajectory.first().timestamp;
    let last = track.trajectory.last().timestamp;
    let span = scan_span(&track.trajectory, &track.timing.schedule, track.timing.cadence);

    println!(
        "Trajectory is valid ({} points, {} to {}, {} minutes)",
        track.trajectory.len(),
        first,
        last,
        track.trajectory.duration().num_minutes()
    );
    println!(
        "  {} {} scans: start {}, end {} ({} minutes)",
        track.timing.sensor,
        track.timing.mode,
        span.start.format("%Y%m%d%H%M"),
        span.end.format("%Y%m%d%H%M"),
        span.duration().num_minutes()
    );
    println!(
        "  {} frames every {} s",
        resampled.len().saturating_sub(2),
        resampled.cadence().num_seconds()
    );
    ExitCode::SUCCESS
}

fn run(args: &RunArgs) -> ExitCode {
    match render_frames(args) {
        Ok(summary) => {
            println!(
                "Rendered {} frames ({} already present, {} without satellite data)",
                summary.rendered, summary.skipped, summary.unavailable
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_track(args: &TrackArgs) -> Result<Track, DriverError> {
    let sensor = Sensor::parse(&args.sensor)?;
    let mode = ScanMode::parse(&args.mode)?;
    let timing = ScanTiming::lookup(sensor, mode)?;
    let cadence = config::parse_cadence(&args.cadence)?;
    let bounds = TimeBounds {
        start: args.start.as_deref().map(config::parse_time_bound).transpose()?,
        end: args.end.as_deref().map(config::parse_time_bound).transpose()?,
    };

    config::require_file(&args.trajectory)?;
    let trajectory = args.format.reader().read(&args.trajectory, &bounds)?;
    info!(
        "Read {} positions from {}",
        trajectory.len(),
        args.trajectory.display()
    );

    Ok(Track {
        timing,
        trajectory,
        cadence,
    })
}

fn render_frames(args: &RunArgs) -> Result<RunSummary, DriverError> {
    let cfg = match &args.config {
        Some(path) => {
            config::require_file(path)?;
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    config::require_dir(&args.sat_dir)?;
    config::require_dir(&args.out_dir)?;

    let track = load_track(&args.track)?;
    let (sensor, mode) = (track.timing.sensor, track.timing.mode);
    let margins = cfg.margins;

    let extent = if args.single_point {
        trajectory::point_bounds(track.trajectory.points(), margins.lat, margins.lon)?
    } else {
        trajectory::bounds(&track.trajectory, margins.lat, margins.lon)?
    };
    info!(
        "Extent: lon {:.3}..{:.3}, lat {:.3}..{:.3}",
        extent.lon_min(),
        extent.lon_max(),
        extent.lat_min(),
        extent.lat_max()
    );

    let resampled = trajectory::resample(&track.trajectory, track.cadence)?;

    let mut loader = DirectorySceneLoader::new(
        args.sat_dir.clone(),
        sensor,
        mode,
        cfg.composite.clone(),
        extent,
    );
    loader.index()?;

    let mut style = cfg.style;
    style.single_point |= args.single_point;
    let renderer = SvgRenderer::new(style);

    let store = FrameStore::open(
        args.out_dir.clone(),
        &cfg.composite,
        &args.tag,
        renderer.extension(),
    )?;
    let run_log = RunLog::new(store.out_dir(), sensor, mode, &args.tag);
    info!("Writing run log to {}", run_log.path().display());

    let mut driver = FrameDriver::new(sensor, mode, loader, renderer, store).with_run_log(run_log);
    let result = driver.run(&extent, &resampled);
    debug!("Driver stopped in state {:?}", driver.state());
    result
}
