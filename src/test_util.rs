use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::scan::{ScanWindow, Sensor};
use crate::scene::{LoadError, Scene, SceneLoader};
use crate::trajectory::{resample, GeoExtent, ResampledTrajectory, Trajectory, TrajectoryPoint};

pub(crate) fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 5, 26, h, m, s).unwrap()
}

pub(crate) fn test_extent() -> GeoExtent {
    GeoExtent::new(100.0, 110.0, 10.0, 15.0).unwrap()
}

/// `n` points from 12:00:00 every 30 s, heading north-east and climbing.
pub(crate) fn straight_track(n: usize) -> ResampledTrajectory {
    let points = (0..n)
        .map(|i| {
            let f = i as f64;
            TrajectoryPoint::new(
                at(12, 0, 0) + TimeDelta::seconds(30 * i as i64),
                10.5 + 0.1 * f,
                100.5 + 0.2 * f,
                1000.0 + 500.0 * f,
            )
        })
        .collect();
    let trajectory = Trajectory::new(points).unwrap();
    resample(&trajectory, TimeDelta::seconds(30)).unwrap()
}

/// Records every requested window start; fails for the starts in `missing`.
#[derive(Debug, Default)]
pub(crate) struct MockLoader {
    pub calls: Vec<DateTime<Utc>>,
    pub missing: Vec<DateTime<Utc>>,
}

impl MockLoader {
    pub fn missing(starts: &[DateTime<Utc>]) -> Self {
        Self {
            calls: Vec::new(),
            missing: starts.to_vec(),
        }
    }
}

impl SceneLoader for MockLoader {
    fn load(&mut self, window: &ScanWindow) -> Result<Scene, LoadError> {
        self.calls.push(window.start);
        if self.missing.contains(&window.start) {
            return Err(LoadError::NoData(window.start));
        }
        Ok(Scene {
            sensor: Sensor::Ahi,
            window: *window,
            composite: "true_color".to_string(),
            extent: test_extent(),
            files: Vec::new(),
        })
    }
}
