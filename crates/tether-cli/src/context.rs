//! Session context for the working tree containing a directory

use std::path::Path;

use tether_core::{ConfigResolver, SessionController};
use tether_git::GitWorkspace;

use crate::error::Result;

/// The working tree and its resolved session.
pub struct SessionContext {
    pub workspace: GitWorkspace,
    pub session: SessionController,
}

impl SessionContext {
    /// Discover the working tree containing `cwd` and resolve its settings.
    pub fn load(cwd: &Path) -> Result<Self> {
        let workspace = GitWorkspace::discover(cwd)?;
        let config = ConfigResolver::new(&workspace).resolve()?;
        tracing::debug!(root = %config.root.display(), target = %config.target(), "Loaded session context");
        Ok(Self {
            workspace,
            session: SessionController::new(config),
        })
    }
}
