use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by state storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read stored state from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored state at {} is not valid: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to move unreadable state at {} aside: {source}", .path.display())]
    SetAside {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}
