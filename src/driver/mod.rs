mod error;
mod run_log;
mod runner;
mod store;

pub use error::DriverError;
pub use run_log::{FrameOutcome, FrameResult, RunLog, RunRecord};
pub use runner::{FrameDriver, RunState, RunSummary};
pub use store::FrameStore;
