//! Git repository fixtures.

use std::path::Path;
use std::process::Command;

/// Initialises a real git repository using `git2` (no commit) with a
/// repository-local identity.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    let repo = git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    });
    {
        let mut config = repo
            .config()
            .unwrap_or_else(|e| panic!("real_git_repo: failed to open config: {e}"));
        config
            .set_str("user.email", "test@test.com")
            .unwrap_or_else(|e| panic!("real_git_repo: failed to set user.email: {e}"));
        config
            .set_str("user.name", "Test User")
            .unwrap_or_else(|e| panic!("real_git_repo: failed to set user.name: {e}"));
    }
    repo
}

/// Stage `relative` (a path below the work tree) into the index.
///
/// # Panics
/// Panics if the index cannot be updated.
pub fn track(repo: &git2::Repository, relative: &str) {
    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("track: failed to open index: {e}"));
    index
        .add_path(Path::new(relative))
        .unwrap_or_else(|e| panic!("track: failed to add {relative}: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("track: failed to write index: {e}"));
}

/// Runs a `git` CLI command in `path` and asserts success.
///
/// # Panics
/// Panics if git cannot be run or exits non-zero.
pub fn git(path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
