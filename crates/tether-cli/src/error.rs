//! Error types for tether-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tether-core
    #[error(transparent)]
    Core(#[from] tether_core::Error),

    /// Error from tether-fs
    #[error(transparent)]
    Fs(#[from] tether_fs::Error),

    /// Error from tether-git
    #[error(transparent)]
    Git(#[from] tether_git::Error),

    /// Error from tether-filter
    #[error(transparent)]
    Filter(#[from] tether_filter::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
