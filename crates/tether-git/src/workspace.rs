//! The git working tree a session mirrors

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tether_fs::{NormalizedPath, SessionPath};

use crate::{Error, Result};

/// A discovered git working tree.
///
/// Root and git directory are resolved once at discovery and never
/// re-read from the process environment afterwards.
pub struct GitWorkspace {
    repo: Repository,
    root: PathBuf,
    git_dir: PathBuf,
}

impl std::fmt::Debug for GitWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitWorkspace")
            .field("root", &self.root)
            .field("git_dir", &self.git_dir)
            .finish()
    }
}

impl GitWorkspace {
    /// Find the working tree containing `start`.
    ///
    /// Walks upwards like `git rev-parse --show-toplevel`. Bare repositories
    /// are rejected since there is nothing to mirror.
    pub fn discover(start: &Path) -> Result<Self> {
        let repo = Repository::discover(start).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                Error::NotAWorkingTree {
                    path: start.to_path_buf(),
                }
            } else {
                Error::Git(e)
            }
        })?;

        let workdir = repo.workdir().ok_or_else(|| Error::NotAWorkingTree {
            path: start.to_path_buf(),
        })?;
        let root = canonical(workdir)?;
        let git_dir = canonical(repo.path())?;

        tracing::debug!(root = %root.display(), git_dir = %git_dir.display(), "Discovered working tree");

        Ok(Self {
            repo,
            root,
            git_dir,
        })
    }

    /// Absolute path of the working tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the git directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Directory holding session state (`<git-dir>/tether`).
    pub fn state_dir(&self) -> PathBuf {
        self.git_dir.join(SessionPath::StateDir.as_str())
    }

    /// Ignore files tracked below the root, in index order.
    ///
    /// Reads the index rather than the filesystem so ignore files that are
    /// themselves ignored (and so not tracked) are never picked up. The
    /// root ignore file is not included.
    pub fn tracked_ignore_files(&self) -> Result<Vec<NormalizedPath>> {
        let index = self.repo.index()?;
        let mut files: Vec<NormalizedPath> = Vec::new();

        for entry in index.iter() {
            let path = NormalizedPath::new(String::from_utf8_lossy(&entry.path).as_ref());
            if path.file_name() != Some(SessionPath::IgnoreFile.as_str()) || path.parent().is_none()
            {
                continue;
            }
            // Conflicted entries appear once per stage
            if files.last() == Some(&path) {
                continue;
            }
            files.push(path);
        }

        tracing::debug!(count = files.len(), "Enumerated tracked ignore files");
        Ok(files)
    }

    /// The user's global excludes file (`core.excludesFile`), if configured.
    ///
    /// A leading `~/` is expanded. No fallback to git's built-in default
    /// location is applied: an unset key means no global source.
    pub fn global_excludes_file(&self) -> Result<Option<PathBuf>> {
        let config = self.repo.config()?;
        match config.get_path("core.excludesfile") {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a string setting from git config.
    pub fn setting(&self, key: &str) -> Result<Option<String>> {
        let config = self.repo.config()?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(Error::InvalidSetting {
                key: key.to_string(),
                message: e.message().to_string(),
            }),
        }
    }

    /// Read a boolean setting from git config.
    pub fn bool_setting(&self, key: &str) -> Result<Option<bool>> {
        let config = self.repo.config()?;
        match config.get_bool(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(Error::InvalidSetting {
                key: key.to_string(),
                message: e.message().to_string(),
            }),
        }
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| tether_fs::Error::io(path, e).into())
}
