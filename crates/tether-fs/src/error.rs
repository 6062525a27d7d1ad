//! Error types for tether-fs

use std::path::PathBuf;

/// Result type for tether-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tether-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transfer lock {path} does not exist. Is a session open?")]
    LockFileMissing { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn lock_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LockFailed {
            path: path.into(),
            source,
        }
    }
}
