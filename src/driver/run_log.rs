use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::runner::{RunState, RunSummary};
use crate::scan::{ScanMode, Sensor};
use crate::scene::CacheDecision;

/// `run_log.yaml` in the output directory, rewritten after every frame.
pub struct RunLog {
    path: PathBuf,
    record: RunRecord,
}

impl RunLog {
    pub fn new(out_dir: &Path, sensor: Sensor, mode: ScanMode, tag: &str) -> Self {
        Self {
            path: out_dir.join("run_log.yaml"),
            record: RunRecord::new(sensor, mode, tag.to_string()),
        }
    }

    pub fn add_frame_result(&mut self, result: FrameResult, summary: RunSummary) {
        self.record.frames.push(result);
        self.record.summary = summary;
        self.save();
    }

    pub fn finish_with_state(&mut self, state: RunState, summary: RunSummary) {
        self.record.state = state;
        self.record.summary = summary;
        self.record.completed_at = Some(Utc::now());
        self.save();
    }

    #[cfg(test)]
    pub(crate) fn record(&self) -> &RunRecord {
        &self.record
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // a run log that cannot be written never stops the frames
    fn save(&self) {
        if let Err(e) = self.record.save(&self.path) {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOutcome {
    Skipped,
    Rendered,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    pub frame_index: usize,
    pub timestamp: DateTime<Utc>,
    pub outcome: FrameOutcome,
    pub scan_start: Option<DateTime<Utc>>,
    pub scene: Option<CacheDecision>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub sensor: Sensor,
    pub mode: ScanMode,
    pub tag: String,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub summary: RunSummary,
    pub frames: Vec<FrameResult>,
}

impl RunRecord {
    fn new(sensor: Sensor, mode: ScanMode, tag: String) -> Self {
        Self {
            sensor,
            mode,
            tag,
            state: RunState::Idle,
            started_at: Utc::now(),
            completed_at: None,
            summary: RunSummary::default(),
            frames: Vec::new(),
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(
            path,
            serde_yaml::to_string(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize run log: {}", e)))?,
        )
    }
}
