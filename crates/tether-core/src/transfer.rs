//! One transfer round: the rsync interposer invoked by lsyncd
//!
//! lsyncd runs the session's shim instead of rsync; the shim re-enters
//! `tether transfer`, which lands here. The shared hold is taken before
//! rsync starts and released when it exits, success or not, so a remote
//! command waiting on the barrier never overlaps a round.

use std::ffi::OsString;
use std::process::{Command, ExitStatus};

use tether_fs::SyncLock;

use crate::{Error, Result};

/// Run `rsync` with `args` under a shared hold on `lock`.
///
/// Returns rsync's exit code. A missing lock file is created rather than
/// failing the round.
pub fn run_transfer_round(lock: &SyncLock, rsync: &str, args: &[OsString]) -> Result<i32> {
    tracing::debug!(lock = %lock.path().display(), rsync, args = args.len(), "Starting transfer round");

    let status = lock
        .with_shared(|| Command::new(rsync).args(args).status())?
        .map_err(|e| Error::spawn(rsync, e))?;

    let code = exit_code(status);
    if code == 0 {
        tracing::debug!("Transfer round finished");
    } else {
        tracing::warn!(code, "rsync exited with a failure status");
    }
    Ok(code)
}

/// Exit code of a finished child, using the shell convention `128 + signal`
/// for children killed by a signal.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
