//! Error types for tether-git

use std::path::PathBuf;

/// Result type for tether-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tether-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] tether_fs::Error),

    #[error("Not inside a git working tree: {path}")]
    NotAWorkingTree { path: PathBuf },

    #[error("Invalid value for git config key '{key}': {message}")]
    InvalidSetting { key: String, message: String },
}
