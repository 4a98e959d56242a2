use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::error::LoadError;
use super::types::Scene;
use crate::scan::{window_for, ScanMode, ScanTiming, ScanWindow, Sensor};
use crate::trajectory::GeoExtent;

/// Source of satellite scenes, one per scan window.
///
/// Returning `Err` is an expected outcome for windows without data; callers
/// treat it as "no scene" rather than a failure of the run.
pub trait SceneLoader {
    fn load(&mut self, window: &ScanWindow) -> Result<Scene, LoadError>;
}

impl<F> SceneLoader for F
where
    F: FnMut(&ScanWindow) -> Result<Scene, LoadError>,
{
    fn load(&mut self, window: &ScanWindow) -> Result<Scene, LoadError> {
        self(window)
    }
}

/// Finds the files of a scan in a flat satellite data directory.
///
/// Scan start times are taken from the file names, using each sensor's
/// naming convention. The directory is indexed once by [`index`](Self::index)
/// and every load is a lookup in that index.
pub struct DirectorySceneLoader {
    sat_dir: PathBuf,
    sensor: Sensor,
    mode: ScanMode,
    composite: String,
    extent: GeoExtent,
    files: Vec<(DateTime<Utc>, PathBuf)>,
}

impl DirectorySceneLoader {
    pub fn new(
        sat_dir: PathBuf,
        sensor: Sensor,
        mode: ScanMode,
        composite: String,
        extent: GeoExtent,
    ) -> Self {
        Self {
            sat_dir,
            sensor,
            mode,
            composite,
            extent,
            files: Vec::new(),
        }
    }

    /// Index every file in the directory with a recognisable scan time.
    pub fn index(&mut self) -> Result<usize, LoadError> {
        if !self.sat_dir.is_dir() {
            return Err(LoadError::DirectoryNotFound(
                self.sat_dir.display().to_string(),
            ));
        }

        self.files.clear();

        for entry in fs::read_dir(&self.sat_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match scan_time_from_name(self.sensor, self.mode, name) {
                Some(ts) => self.files.push((ts, path)),
                None => log::debug!("Skipping {}: no {} scan time", path.display(), self.mode),
            }
        }

        self.files.sort();
        log::info!(
            "Indexed {} {} files in {}",
            self.files.len(),
            self.sensor,
            self.sat_dir.display()
        );
        Ok(self.files.len())
    }
}

impl SceneLoader for DirectorySceneLoader {
    fn load(&mut self, window: &ScanWindow) -> Result<Scene, LoadError> {
        let lo = self.files.partition_point(|(t, _)| *t < window.start);
        let hi = self.files.partition_point(|(t, _)| *t < window.end());

        if lo >= hi {
            return Err(LoadError::NoData(window.start));
        }

        log::debug!("{} files for scan {}", hi - lo, window);
        Ok(Scene {
            sensor: self.sensor,
            window: *window,
            composite: self.composite.clone(),
            extent: self.extent,
            files: self.files[lo..hi].iter().map(|(_, p)| p.clone()).collect(),
        })
    }
}

lazy_static! {
    /// `HS_H08_20190526_0530_B03_FLDK_R05_S0110.DAT`, target area files carry `R301`..`R304`
    static ref AHI_RE: Regex = Regex::new(
        r"^HS_H\d\d_(?P<date>\d{8})_(?P<time>\d{4})_B\d\d_(?P<sector>FLDK|R30(?P<sub>[1-4]))_"
    )
    .unwrap();
    /// `OR_ABI-L1b-RadF-M6C01_G16_s20192461530254_e..._c....nc`, tenths of a second dropped
    static ref ABI_RE: Regex =
        Regex::new(r"(?:Rad|CMIP)(?P<sector>F|C|M1|M2)-.*_s(?P<start>\d{13})\d_").unwrap();
    /// `MSG4-SEVI-MSG15-0100-NA-20190526054241.536000000Z-NA.nat`, stamped with the scan end
    static ref NAT_RE: Regex = Regex::new(r"-(?P<end>\d{14})\.\d+Z-").unwrap();
    /// First `YYYYmmddHHMM` stamp, as in SEVIRI HRIT and FY-4A names
    static ref STAMP_RE: Regex = Regex::new(r"(?P<stamp>\d{12})").unwrap();
}

/// Scan start time encoded in a satellite file name, if it belongs to `mode`.
pub fn scan_time_from_name(sensor: Sensor, mode: ScanMode, name: &str) -> Option<DateTime<Utc>> {
    match sensor {
        Sensor::Ahi => himawari_time(mode, name),
        Sensor::Abi => goes_time(mode, name),
        Sensor::Sevn => native_time(mode, name),
        Sensor::Sev | Sensor::Agr => stamp_time(name),
    }
}

fn himawari_time(mode: ScanMode, name: &str) -> Option<DateTime<Utc>> {
    let caps = AHI_RE.captures(name)?;
    let cycle = NaiveDateTime::parse_from_str(&format!("{}{}", &caps["date"], &caps["time"]), "%Y%m%d%H%M")
        .ok()?
        .and_utc();

    // target area sub-scans run every 2.5 minutes within the 10 minute cycle
    match (mode, caps.name("sub")) {
        (ScanMode::Fd, None) => Some(cycle),
        (ScanMode::Meso, Some(sub)) => {
            let n: i64 = sub.as_str().parse().ok()?;
            Some(cycle + TimeDelta::seconds((n - 1) * 150))
        }
        _ => None,
    }
}

fn goes_time(mode: ScanMode, name: &str) -> Option<DateTime<Utc>> {
    let sector = match mode {
        ScanMode::Fd => "F",
        ScanMode::Conus | ScanMode::Pacus => "C",
        ScanMode::M1 => "M1",
        ScanMode::M2 => "M2",
        _ => return None,
    };
    let caps = ABI_RE.captures(name)?;
    if &caps["sector"] != sector {
        return None;
    }

    NaiveDateTime::parse_from_str(&caps["start"], "%Y%j%H%M%S")
        .ok()
        .map(|t| t.and_utc())
}

/// Native files name the end of the scan. Stepping back by the imaging time
/// lands inside the repeat cycle, which gives the nominal start.
fn native_time(mode: ScanMode, name: &str) -> Option<DateTime<Utc>> {
    let imaging = match mode {
        ScanMode::Fd => TimeDelta::minutes(12),
        ScanMode::Rss => TimeDelta::minutes(4),
        _ => return None,
    };
    let caps = NAT_RE.captures(name)?;
    let end = NaiveDateTime::parse_from_str(&caps["end"], "%Y%m%d%H%M%S")
        .ok()?
        .and_utc();

    let timing = ScanTiming::lookup(Sensor::Sevn, mode).ok()?;
    Some(window_for(end - imaging, &timing.schedule, timing.cadence).start)
}

fn stamp_time(name: &str) -> Option<DateTime<Utc>> {
    let caps = STAMP_RE.captures(name)?;
    NaiveDateTime::parse_from_str(&caps["stamp"], "%Y%m%d%H%M")
        .ok()
        .map(|t| t.and_utc())
}
