//! Tests for working tree discovery and index enumeration

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tether_git::{Error, GitWorkspace};
use tether_test_utils::tree::TestTree;

fn names(workspace: &GitWorkspace) -> Vec<String> {
    workspace
        .tracked_ignore_files()
        .unwrap()
        .into_iter()
        .map(|p| p.as_str().to_string())
        .collect()
}

#[test]
fn discover_from_nested_directory_finds_root() {
    let tree = TestTree::new();
    let nested = tree.mkdir("src/deep/er");

    let workspace = GitWorkspace::discover(&nested).unwrap();

    assert_eq!(
        workspace.root(),
        dunce::canonicalize(tree.root()).unwrap().as_path()
    );
    assert!(workspace.git_dir().ends_with(".git"));
    assert!(workspace.state_dir().ends_with(".git/tether"));
}

#[test]
fn discover_outside_repository_fails() {
    let temp = TempDir::new().unwrap();

    let err = GitWorkspace::discover(temp.path()).unwrap_err();
    assert!(matches!(err, Error::NotAWorkingTree { .. }), "got {err:?}");
}

#[test]
fn tracked_ignore_files_skip_root_and_untracked() {
    let tree = TestTree::new();
    tree.write_tracked(".gitignore", "target/\n");
    tree.write_tracked("b/.gitignore", "*.o\n");
    tree.write_tracked("a/nested/.gitignore", "*.tmp\n");
    tree.write("c/.gitignore", "untracked\n");
    tree.write_tracked("a/not-an-ignore-file", "x\n");

    let workspace = GitWorkspace::discover(tree.root()).unwrap();

    assert_eq!(names(&workspace), vec!["a/nested/.gitignore", "b/.gitignore"]);
}

#[test]
fn tracked_ignore_files_empty_index() {
    let tree = TestTree::new();
    let workspace = GitWorkspace::discover(tree.root()).unwrap();
    assert!(names(&workspace).is_empty());
}

#[test]
fn global_excludes_file_reads_local_override() {
    let tree = TestTree::new();
    let excludes = tree.write("my-excludes", "*.swp\n");
    tree.set_config("core.excludesFile", excludes.to_str().unwrap());

    let workspace = GitWorkspace::discover(tree.root()).unwrap();

    assert_eq!(workspace.global_excludes_file().unwrap(), Some(excludes));
}

#[test]
fn settings_read_from_git_config() {
    let tree = TestTree::new();
    tree.set_config("tether.host", "builder.example.com");
    tree.set_config("tether.compress", "false");

    let workspace = GitWorkspace::discover(tree.root()).unwrap();

    assert_eq!(
        workspace.setting("tether.host").unwrap().as_deref(),
        Some("builder.example.com")
    );
    assert_eq!(workspace.bool_setting("tether.compress").unwrap(), Some(false));
    assert_eq!(workspace.setting("tether.remotePath").unwrap(), None);
}

#[test]
fn invalid_bool_setting_is_reported() {
    let tree = TestTree::new();
    tree.set_config("tether.compress", "sometimes");

    let workspace = GitWorkspace::discover(tree.root()).unwrap();

    let err = workspace.bool_setting("tether.compress").unwrap_err();
    assert!(matches!(err, Error::InvalidSetting { .. }));
}
