//! End-to-end tests that invoke the compiled `tether` binary.
//!
//! Every command runs with `HOME` and `XDG_CONFIG_HOME` pointed at a scratch
//! directory so the user's own settings never leak in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tether_test_utils::tree::TestTree;

/// Get a Command for the tether binary, isolated from user settings
fn tether_cmd(dir: &Path, home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tether").expect("Failed to find tether binary");
    cmd.current_dir(dir)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// A working tree with a host configured and only tree-local ignore sources.
fn configured_tree() -> (TestTree, TempDir) {
    let tree = TestTree::new();
    tree.set_config("tether.host", "builder");
    tree.set_config("tether.remotePath", "mirror/app");
    tree.set_config("tether.ignore", "root,subdirs");
    (tree, TempDir::new().unwrap())
}

// ============================================================================
// General
// ============================================================================

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    tether_cmd(home.path(), home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("Run one rsync transfer").not());
}

#[test]
fn no_command_prints_hint() {
    let home = TempDir::new().unwrap();
    tether_cmd(home.path(), home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("tether --help"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    tether_cmd(home.path(), home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tether"));
}

#[test]
fn outside_working_tree_fails() {
    let home = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    tether_cmd(outside.path(), home.path())
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Not inside a git working tree"));
}

#[test]
fn missing_host_fails_with_hint() {
    let tree = TestTree::new();
    let home = TempDir::new().unwrap();
    tether_cmd(tree.root(), home.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote host configured"));
}

// ============================================================================
// Filters and configuration preview
// ============================================================================

#[test]
fn filters_prints_rules_in_order() {
    let (tree, home) = configured_tree();
    tree.write(".gitignore", "# objects\n**/*.o\n!keep.o\n");
    tree.write_tracked("sub/.gitignore", "/local\n");

    tether_cmd(tree.root(), home.path())
        .arg("filters")
        .assert()
        .success()
        .stdout("- .git\n- **/*.o\n- *.o\n+ keep.o\n- /sub/local\n");
}

#[test]
fn filters_json() {
    let (tree, home) = configured_tree();
    tree.write(".gitignore", "target/\n");

    tether_cmd(tree.root(), home.path())
        .args(["filters", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sense\": \"exclude\""))
        .stdout(predicate::str::contains("\"pattern\": \"target/\""));
}

#[test]
fn filters_fail_on_unreadable_literal_source() {
    let (tree, home) = configured_tree();
    tree.set_config("tether.ignore", "root,does-not-exist.txt");

    tether_cmd(tree.root(), home.path())
        .arg("filters")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn config_prints_lsyncd_configuration() {
    let (tree, home) = configured_tree();
    tree.write(".gitignore", "*.log\n");

    tether_cmd(tree.root(), home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("delete = \"running\""))
        .stdout(predicate::str::contains("target = \"builder:mirror/app/\""))
        .stdout(predicate::str::contains("\"- *.log\""));
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[test]
fn status_json_when_closed() {
    let (tree, home) = configured_tree();

    tether_cmd(tree.root(), home.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"closed\""))
        .stdout(predicate::str::contains("\"target\": \"builder:mirror/app\""));
}

#[test]
fn close_without_session_succeeds() {
    let (tree, home) = configured_tree();

    for _ in 0..2 {
        tether_cmd(tree.root(), home.path())
            .arg("close")
            .assert()
            .success()
            .stdout(predicate::str::contains("No open session"));
    }
}

#[test]
fn run_without_session_fails() {
    let (tree, home) = configured_tree();

    tether_cmd(tree.root(), home.path())
        .args(["run", "make"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No open session"));
}

#[cfg(unix)]
#[test]
fn open_status_close_with_stand_in_lsyncd() {
    let (tree, home) = configured_tree();
    let lsyncd = home.path().join("lsyncd");
    tether_fs::io::write_executable(
        &lsyncd,
        "#!/bin/sh\n\
         pidfile=$(sed -n 's/^ *pidfile = \"\\(.*\\)\",$/\\1/p' \"$1\")\n\
         ( sleep 30 & echo $! > \"$pidfile\"; wait ) > /dev/null 2>&1 &\n",
    )
    .unwrap();
    tree.set_config("tether.lsyncd", &lsyncd.to_string_lossy());

    tether_cmd(tree.root(), home.path())
        .arg("open")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session open"));

    tether_cmd(tree.root(), home.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"open\""));

    tether_cmd(tree.root(), home.path())
        .arg("open")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already open"));

    let shim = std::fs::read_to_string(tree.git_dir().join("tether").join("rsync-shim")).unwrap();
    assert!(shim.starts_with("#!/bin/sh\nexec "));
    assert!(shim.contains(" transfer --lock "));

    tether_cmd(tree.root(), home.path())
        .arg("close")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session closed"));
}

// ============================================================================
// Transfer interposer
// ============================================================================

#[cfg(unix)]
#[test]
fn transfer_propagates_rsync_exit_code() {
    let home = TempDir::new().unwrap();
    let lock = home.path().join("transfer.lock");

    tether_cmd(home.path(), home.path())
        .args(["transfer", "--lock"])
        .arg(&lock)
        .args(["--rsync", "sh", "--", "-c", "exit 4"])
        .assert()
        .code(4);

    assert!(lock.is_file());
}

#[cfg(unix)]
#[test]
fn transfer_success() {
    let home = TempDir::new().unwrap();
    let lock = home.path().join("transfer.lock");

    tether_cmd(home.path(), home.path())
        .args(["transfer", "--lock"])
        .arg(&lock)
        .args(["--rsync", "true", "--", "-a", "src/", "host:dst/"])
        .assert()
        .success();
}
