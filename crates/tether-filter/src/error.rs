//! Error types for tether-filter

use std::path::PathBuf;

/// Result type for tether-filter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling filter rules
///
/// Translation itself never fails; every error here comes from resolving
/// or reading a rule source.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required rule source could not be read
    #[error("Cannot read {rule_source} ignore source {path}: {cause}")]
    SourceUnreadable {
        rule_source: String,
        path: PathBuf,
        #[source]
        cause: tether_fs::Error,
    },

    /// An empty rule source identifier
    #[error("Empty ignore source identifier")]
    EmptySource,

    /// Git error while enumerating sources
    #[error(transparent)]
    Git(#[from] tether_git::Error),

    /// Filesystem error
    #[error(transparent)]
    Fs(#[from] tether_fs::Error),
}
