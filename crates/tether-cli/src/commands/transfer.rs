//! The rsync interposer lsyncd calls through the transfer shim

use std::ffi::OsString;
use std::path::PathBuf;

use tether_core::run_transfer_round;
use tether_fs::SyncLock;

use crate::error::Result;

/// Run one transfer round and return rsync's exit code
pub fn run_transfer(lock: PathBuf, rsync: &str, args: &[OsString]) -> Result<i32> {
    let lock = SyncLock::new(lock);
    Ok(run_transfer_round(&lock, rsync, args)?)
}
