use std::path::PathBuf;

use crate::scan::{ScanWindow, Sensor};
use crate::trajectory::GeoExtent;

/// Satellite data selected for one scan window.
///
/// Carries the input files and the target area; decoding and resampling onto
/// `extent` is left to whatever consumes the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub sensor: Sensor,
    pub window: ScanWindow,
    pub composite: String,
    pub extent: GeoExtent,
    pub files: Vec<PathBuf>,
}
