use std::path::PathBuf;

use thiserror::Error;

/// Backend failures. Every variant is a "storage unavailable" condition from
/// the pipeline's point of view.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
