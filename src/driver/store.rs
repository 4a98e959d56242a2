use std::path::{Path, PathBuf};

use crate::config::{require_dir, ConfigError};
use crate::render::{Frame, RenderError};

/// Output directory of a run and the naming of the frames in it.
///
/// Frames are named `<index:04>_<composite>_<tag>.<ext>`. A frame counts as
/// complete once a file exists under that name; [`Frame::save`] only ever
/// creates it by renaming a fully written temporary file.
#[derive(Debug, Clone)]
pub struct FrameStore {
    out_dir: PathBuf,
    composite: String,
    tag: String,
    extension: String,
}

impl FrameStore {
    /// Fails with [`ConfigError::MissingDirectory`] unless `out_dir` exists.
    pub fn open(out_dir: PathBuf, composite: &str, tag: &str, extension: &str) -> Result<Self, ConfigError> {
        require_dir(&out_dir)?;
        Ok(Self {
            out_dir,
            composite: composite.to_string(),
            tag: tag.to_string(),
            extension: extension.to_string(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn frame_path(&self, frame_index: usize) -> PathBuf {
        self.out_dir.join(format!(
            "{:04}_{}_{}.{}",
            frame_index, self.composite, self.tag, self.extension
        ))
    }

    pub fn is_complete(&self, frame_index: usize) -> bool {
        self.frame_path(frame_index).is_file()
    }

    pub fn persist(&self, frame_index: usize, frame: &Frame) -> Result<PathBuf, RenderError> {
        let path = self.frame_path(frame_index);
        frame.save(&path)?;
        Ok(path)
    }
}
