//! [`TestTree`] builder for working tree scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::git;

/// A temporary git working tree with helpers for writing and tracking files.
///
/// # Example
///
/// ```rust,no_run
/// use tether_test_utils::tree::TestTree;
///
/// let tree = TestTree::new();
/// tree.write(".gitignore", "target/\n");
/// tree.write_tracked("sub/.gitignore", "*.o\n");
/// tree.set_config("tether.host", "builder");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    repo: git2::Repository,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create a temporary directory initialised as a git repository.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo = git::real_git_repo(temp_dir.path());
        Self { temp_dir, repo }
    }

    /// Return the root path of the working tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the git directory of the working tree.
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `content` to `relative` and stage it in the index.
    pub fn write_tracked(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.write(relative, content);
        git::track(&self.repo, relative);
        path
    }

    /// Set a repository-local git config value.
    pub fn set_config(&self, key: &str, value: &str) {
        self.repo.config().unwrap().set_str(key, value).unwrap();
    }

    /// Create a directory (and parents) below the root.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }
}
