use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error at {}: {}", .path.display(), .source)]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive error: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::IoError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
