use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write frame {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("nothing to draw at trajectory index {0}")]
    NoPosition(usize),
}
