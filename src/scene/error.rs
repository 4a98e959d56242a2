use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no satellite data for {0}")]
    NoData(DateTime<Utc>),
    #[error("satellite directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("satellite directory read error: {0}")]
    Io(#[from] std::io::Error),
}
