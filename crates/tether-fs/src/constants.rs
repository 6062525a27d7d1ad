//! Well-known file and directory names used by a sync session.

/// Files and directories a session reads or writes.
///
/// Session state lives under `<git-dir>/tether/`, which keeps it out of the
/// working tree and therefore out of every transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPath {
    /// The `tether` state directory inside the git directory
    StateDir,
    /// Root ignore file of the working tree
    IgnoreFile,
    /// Per-tree settings file at the root of the working tree
    TreeConfig,
    /// Advisory lock anchor shared by transfer rounds and remote commands
    LockFile,
    /// PID of the running lsyncd process
    PidFile,
    /// lsyncd log output
    LogFile,
    /// Emitted lsyncd configuration
    EngineConfig,
    /// Shell script lsyncd runs in place of rsync
    TransferShim,
}

impl SessionPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateDir => "tether",
            Self::IgnoreFile => ".gitignore",
            Self::TreeConfig => ".tether.toml",
            Self::LockFile => "transfer.lock",
            Self::PidFile => "lsyncd.pid",
            Self::LogFile => "lsyncd.log",
            Self::EngineConfig => "lsyncd.conf.lua",
            Self::TransferShim => "rsync-shim",
        }
    }
}

impl std::fmt::Display for SessionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
