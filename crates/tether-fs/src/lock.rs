//! Transfer lock coordination
//!
//! A single lock file per session coordinates two kinds of actors:
//!
//! - **Transfer rounds** take a *shared* hold for the duration of one rsync
//!   batch. Any number of rounds may hold it at once.
//! - **Remote commands** pass an *exclusive barrier*: the exclusive lock is
//!   acquired and released immediately. The command is never run while
//!   holding it.
//!
//! The result: a remote command never starts while a transfer round that
//! began before the request is still running, and rounds that start after
//! the barrier proceed alongside the remote command.
//!
//! Locks are advisory `flock`-style locks through `fs2`, taken on a fresh
//! file handle per actor, so they coordinate across processes as well as
//! across threads of one process. The file content is never read or
//! written.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// How a barrier request got through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierPass {
    /// No transfer round was in flight.
    Immediate,
    /// At least one transfer round was in flight and the request waited for it.
    Waited,
}

/// Handle on a session's transfer lock file.
#[derive(Debug, Clone)]
pub struct SyncLock {
    path: PathBuf,
}

impl SyncLock {
    /// Create a handle for the lock file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the lock anchor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the lock anchor file if it does not exist yet.
    pub fn ensure(&self) -> Result<()> {
        self.open_or_create().map(drop)
    }

    /// Block until a shared hold is granted.
    ///
    /// The hold is released when the returned guard is dropped. The lock
    /// file is created if missing so a transfer round never fails on it.
    pub fn shared(&self) -> Result<SharedHold> {
        let file = self.open_or_create()?;
        FileExt::lock_shared(&file).map_err(|e| Error::lock_failed(&self.path, e))?;
        tracing::debug!(lock = %self.path.display(), "Shared hold acquired");
        Ok(SharedHold {
            file,
            path: self.path.clone(),
        })
    }

    /// Run `f` under a shared hold.
    ///
    /// The hold is released as soon as `f` returns, whatever it returns.
    pub fn with_shared<T>(&self, f: impl FnOnce() -> T) -> Result<T> {
        let hold = self.shared()?;
        let value = f();
        drop(hold);
        Ok(value)
    }

    /// Pass the exclusive barrier.
    ///
    /// Tries the exclusive lock without blocking first. If a shared holder
    /// is in flight, `on_wait` is called once (to tell the user) and the
    /// call then blocks with no timeout. The exclusive lock is released
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockFileMissing`] if the lock file does not exist.
    pub fn barrier(&self, on_wait: impl FnOnce()) -> Result<BarrierPass> {
        let file = match OpenOptions::new().read(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::LockFileMissing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let pass = match FileExt::try_lock_exclusive(&file) {
            Ok(()) => BarrierPass::Immediate,
            Err(e) if is_contended(&e) => {
                tracing::debug!(lock = %self.path.display(), "Transfer in flight, waiting");
                on_wait();
                FileExt::lock_exclusive(&file).map_err(|e| Error::lock_failed(&self.path, e))?;
                BarrierPass::Waited
            }
            Err(e) => return Err(Error::lock_failed(&self.path, e)),
        };

        FileExt::unlock(&file).map_err(|e| Error::lock_failed(&self.path, e))?;
        tracing::debug!(lock = %self.path.display(), ?pass, "Barrier passed");
        Ok(pass)
    }

    fn open_or_create(&self) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))
    }
}

/// A shared hold on the transfer lock, released on drop.
#[derive(Debug)]
pub struct SharedHold {
    file: File,
    path: PathBuf,
}

impl Drop for SharedHold {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            // Closing the handle releases the lock anyway
            tracing::debug!(lock = %self.path.display(), error = %e, "Explicit unlock failed");
        } else {
            tracing::debug!(lock = %self.path.display(), "Shared hold released");
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn barrier_without_holders_is_immediate() {
        let dir = tempdir().unwrap();
        let lock = SyncLock::new(dir.path().join("transfer.lock"));
        lock.ensure().unwrap();

        let mut waited = false;
        let pass = lock.barrier(|| waited = true).unwrap();

        assert_eq!(pass, BarrierPass::Immediate);
        assert!(!waited);
    }

    #[test]
    fn barrier_requires_lock_file() {
        let dir = tempdir().unwrap();
        let lock = SyncLock::new(dir.path().join("transfer.lock"));

        let err = lock.barrier(|| {}).unwrap_err();
        assert!(matches!(err, Error::LockFileMissing { .. }));
    }

    #[test]
    fn shared_hold_creates_lock_file() {
        let dir = tempdir().unwrap();
        let lock = SyncLock::new(dir.path().join("transfer.lock"));
        assert!(!lock.path().is_file());

        let hold = lock.shared().unwrap();
        assert!(lock.path().is_file());
        drop(hold);
    }

    #[test]
    fn shared_holds_coexist() {
        let dir = tempdir().unwrap();
        let lock = SyncLock::new(dir.path().join("transfer.lock"));

        let first = lock.shared().unwrap();
        let second = lock.shared().unwrap();
        drop(first);
        drop(second);
    }

    #[test]
    fn with_shared_releases_after_closure() {
        let dir = tempdir().unwrap();
        let lock = SyncLock::new(dir.path().join("transfer.lock"));

        let value = lock.with_shared(|| 7).unwrap();
        assert_eq!(value, 7);

        let pass = lock.barrier(|| panic!("should not wait")).unwrap();
        assert_eq!(pass, BarrierPass::Immediate);
    }

    #[test]
    fn lock_file_content_is_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transfer.lock");
        std::fs::write(&path, "opaque").unwrap();
        let lock = SyncLock::new(&path);

        lock.with_shared(|| ()).unwrap();
        lock.barrier(|| {}).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "opaque");
    }
}
