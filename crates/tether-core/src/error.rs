//! Error types for tether-core

use std::path::PathBuf;

/// Result type for tether-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tether-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings are missing or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The remote host identifier cannot be used as an rsync/ssh target
    #[error("Invalid remote host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    /// A remote command was requested with no session running
    #[error("No open session for {root}. Run 'tether open' first.")]
    NoSession { root: PathBuf },

    /// A session is already running for this working tree
    #[error("A session is already open for {root} (lsyncd pid {pid})")]
    SessionAlreadyOpen { root: PathBuf, pid: u32 },

    /// lsyncd failed to start or stop
    #[error("lsyncd failed: {message}")]
    EngineFailed { message: String },

    /// An external program could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem or lock error from tether-fs
    #[error(transparent)]
    Fs(#[from] tether_fs::Error),

    /// Git error from tether-git
    #[error(transparent)]
    Git(#[from] tether_git::Error),

    /// Filter compilation error from tether-filter
    #[error(transparent)]
    Filter(#[from] tether_filter::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}
