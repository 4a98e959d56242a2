use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("trajectory needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("timestamp {timestamp} at point {index} is not after its predecessor")]
    NonIncreasing {
        index: usize,
        timestamp: DateTime<Utc>,
    },
    #[error("resampling cadence must be positive, got {0}")]
    InvalidCadence(TimeDelta),
    #[error("degenerate {axis} extent: {min} .. {max}")]
    DegenerateExtent {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    #[error("trajectory file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}
