use thiserror::Error;

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::scene::LoadError;
use crate::trajectory::DataError;

/// Anything that stops a run. A scan without data is not in here; it turns
/// into a fallback or track-only frame inside the loop.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Satellite data error: {0}")]
    Scenes(#[from] LoadError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
