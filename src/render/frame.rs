use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::RenderError;
use crate::scene::Scene;
use crate::trajectory::{GeoExtent, ResampledTrajectory};

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'a> {
    pub extent: &'a GeoExtent,
    pub trajectory: &'a ResampledTrajectory,
    pub frame_index: usize,
    /// Index of the current aircraft position in `trajectory`.
    pub position: usize,
    /// `None` draws the track without a satellite background.
    pub scene: Option<&'a Scene>,
    pub timestamp: DateTime<Utc>,
}

pub trait FrameRenderer {
    /// File extension of the produced frames, without the dot.
    fn extension(&self) -> &str;

    fn render(&mut self, request: &FrameRequest<'_>) -> Result<Frame, RenderError>;
}

/// An encoded frame, held in memory until it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the frame to `path`.
    ///
    /// The data goes to a `.partial` sibling first and is renamed into place,
    /// so `path` either holds a complete frame or does not exist.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let tmp = partial_path(path);
        let write_err = |source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&tmp, self.bytes()).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(e)
        })
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}
