use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;

use super::error::DriverError;
use super::run_log::{FrameOutcome, FrameResult, RunLog};
use super::store::FrameStore;
use crate::render::{FrameRenderer, FrameRequest};
use crate::scan::{window_for, ScanMode, ScanTiming, Sensor};
use crate::scene::{CacheDecision, SceneCache, SceneLoader};
use crate::trajectory::{GeoExtent, ResampledTrajectory};

/// Resampled points before this index are track history only and get no frame.
const FIRST_POSITION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    LoadingSchedule,
    Iterating { frame: usize },
    Skipped { frame: usize },
    Rendered { frame: usize },
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rendered: usize,
    pub skipped: usize,
    /// Loader invocations, successful or not.
    pub loads: usize,
    pub reuses: usize,
    pub fallbacks: usize,
    pub unavailable: usize,
}

/// Walks a resampled trajectory and produces one frame per position.
///
/// Frame `n` shows the aircraft at resampled point `n + 1` together with the
/// satellite scene whose scan window contains that moment. Frames already in
/// the [`FrameStore`] are skipped without touching the loader or renderer, so
/// an interrupted run picks up where it stopped.
pub struct FrameDriver<L, R> {
    sensor: Sensor,
    mode: ScanMode,
    loader: L,
    renderer: R,
    store: FrameStore,
    cache: SceneCache,
    state: RunState,
    summary: RunSummary,
    run_log: Option<RunLog>,
}

impl<L: SceneLoader, R: FrameRenderer> FrameDriver<L, R> {
    pub fn new(sensor: Sensor, mode: ScanMode, loader: L, renderer: R, store: FrameStore) -> Self {
        Self {
            sensor,
            mode,
            loader,
            renderer,
            store,
            cache: SceneCache::new(),
            state: RunState::Idle,
            summary: RunSummary::default(),
            run_log: None,
        }
    }

    pub fn with_run_log(mut self, run_log: RunLog) -> Self {
        self.run_log = Some(run_log);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn loader(&self) -> &L {
        &self.loader
    }

    #[cfg(test)]
    pub(crate) fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn run(
        &mut self,
        extent: &GeoExtent,
        trajectory: &ResampledTrajectory,
    ) -> Result<RunSummary, DriverError> {
        self.summary = RunSummary::default();
        let result = self.run_frames(extent, trajectory);

        self.state = match &result {
            Ok(summary) => {
                info!(
                    "Run complete: {} rendered, {} skipped, {} scene loads",
                    summary.rendered, summary.skipped, summary.loads
                );
                RunState::Done
            }
            Err(e) => {
                error!("Run aborted: {}", e);
                RunState::Aborted
            }
        };
        if let Some(run_log) = self.run_log.as_mut() {
            run_log.finish_with_state(self.state, self.summary);
        }

        result
    }

    fn run_frames(
        &mut self,
        extent: &GeoExtent,
        trajectory: &ResampledTrajectory,
    ) -> Result<RunSummary, DriverError> {
        self.state = RunState::LoadingSchedule;
        let timing = ScanTiming::lookup(self.sensor, self.mode)?;
        info!(
            "{} {}: {} scans per hour, {} s each",
            timing.sensor,
            timing.mode,
            timing.schedule.offsets().len(),
            timing.cadence.num_seconds()
        );

        for (index, point) in trajectory.points().iter().enumerate().skip(FIRST_POSITION) {
            let frame = index - 1;
            self.state = RunState::Iterating { frame };

            if self.store.is_complete(frame) {
                debug!("Frame {} already exists, skipping", frame);
                self.summary.skipped += 1;
                self.state = RunState::Skipped { frame };
                self.record(frame, point.timestamp, FrameOutcome::Skipped, None, None);
                continue;
            }

            let window = window_for(point.timestamp, &timing.schedule, timing.cadence);
            let lookup = self.cache.get_or_load(&window, &mut self.loader);
            self.summary.loads = self.cache.loads();
            match lookup.decision {
                CacheDecision::Loaded => info!("{}: loaded scene {}", point.timestamp, window),
                CacheDecision::Reused => {
                    self.summary.reuses += 1;
                    debug!("{}: reusing scene {}", point.timestamp, window);
                }
                CacheDecision::Fallback => {
                    self.summary.fallbacks += 1;
                    warn!("{}: no scene for {}, using last good scene", point.timestamp, window);
                }
                CacheDecision::Unavailable => {
                    self.summary.unavailable += 1;
                    warn!("{}: no scene for {}, drawing track only", point.timestamp, window);
                }
            }

            let request = FrameRequest {
                extent,
                trajectory,
                frame_index: frame,
                position: index,
                scene: lookup.scene.as_deref(),
                timestamp: point.timestamp,
            };
            let rendered = self.renderer.render(&request)?;
            self.store.persist(frame, &rendered)?;

            self.summary.rendered += 1;
            self.state = RunState::Rendered { frame };
            self.record(
                frame,
                point.timestamp,
                FrameOutcome::Rendered,
                Some(window.start),
                Some(lookup.decision),
            );
        }

        Ok(self.summary)
    }

    fn record(
        &mut self,
        frame: usize,
        timestamp: DateTime<Utc>,
        outcome: FrameOutcome,
        scan_start: Option<DateTime<Utc>>,
        scene: Option<CacheDecision>,
    ) {
        let Some(run_log) = self.run_log.as_mut() else {
            return;
        };
        run_log.add_frame_result(
            FrameResult {
                frame_index: frame,
                timestamp,
                outcome,
                scan_start,
                scene,
                path: self.store.frame_path(frame),
            },
            self.summary,
        );
    }
}
