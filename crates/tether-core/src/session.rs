//! Lifecycle of the background lsyncd process for one working tree

use std::fs::OpenOptions;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use serde::Serialize;
use tether_filter::{FilterCompiler, FilterSet, IgnoreIndex};
use tether_fs::io;

use crate::config::SessionConfig;
use crate::emitter::ConfigEmitter;
use crate::process::{is_process_alive, read_pid, terminate_process, wait_for};
use crate::transfer::exit_code;
use crate::{Error, Result};

const PID_TIMEOUT: Duration = Duration::from_secs(10);
const STOP_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State of the session as seen from its PID file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionStatus {
    /// lsyncd is running
    Open { pid: u32 },
    /// A PID file exists but its process is gone
    Stale { pid: u32 },
    /// No PID file
    Closed,
}

/// Opens, inspects and closes the session of one working tree.
#[derive(Debug, Clone)]
pub struct SessionController {
    config: SessionConfig,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Probe the PID file. Liveness is checked, existence alone is not enough.
    pub fn status(&self) -> Result<SessionStatus> {
        let status = match read_pid(&self.config.pid_path())? {
            None => SessionStatus::Closed,
            Some(pid) if is_process_alive(pid) => SessionStatus::Open { pid },
            Some(pid) => SessionStatus::Stale { pid },
        };
        tracing::debug!(?status, "Probed session");
        Ok(status)
    }

    /// Probe the session and remove a stale PID file if one is found.
    ///
    /// The returned status still reports `Stale` so callers can tell the user.
    pub fn refresh(&self) -> Result<SessionStatus> {
        let status = self.status()?;
        if let SessionStatus::Stale { pid } = status {
            self.clear_stale(pid)?;
        }
        Ok(status)
    }

    /// Return the lsyncd PID, or [`Error::NoSession`].
    pub fn require_open(&self) -> Result<u32> {
        match self.status()? {
            SessionStatus::Open { pid } => Ok(pid),
            _ => Err(Error::NoSession {
                root: self.config.root.clone(),
            }),
        }
    }

    /// Compile the filters for this session.
    pub fn compile_filters<I: IgnoreIndex + ?Sized>(&self, index: &I) -> Result<FilterSet> {
        Ok(FilterCompiler::new(index).compile(&self.config.sources)?)
    }

    /// Start a session and return the lsyncd PID.
    ///
    /// Regenerates the filter set, the lsyncd configuration and the transfer
    /// shim, then starts lsyncd and waits for it to write its PID file. A
    /// stale PID file is cleared first.
    pub fn open<I: IgnoreIndex + ?Sized>(&self, index: &I, tether_exe: &Path) -> Result<u32> {
        match self.status()? {
            SessionStatus::Open { pid } => {
                return Err(Error::SessionAlreadyOpen {
                    root: self.config.root.clone(),
                    pid,
                });
            }
            SessionStatus::Stale { pid } => self.clear_stale(pid)?,
            SessionStatus::Closed => {}
        }

        let filters = self.compile_filters(index)?;
        ConfigEmitter::new(&self.config, &filters).write(tether_exe)?;
        self.config.lock().ensure()?;

        self.start_engine()?;

        let pid = wait_for(PID_TIMEOUT, POLL_INTERVAL, || {
            read_pid(&self.config.pid_path())
                .ok()
                .flatten()
                .filter(|pid| is_process_alive(*pid))
        })
        .ok_or_else(|| Error::EngineFailed {
            message: format!(
                "lsyncd did not report a running process; see {}",
                self.config.log_path().display()
            ),
        })?;

        tracing::info!(pid, target = %self.config.target(), "Session opened");
        Ok(pid)
    }

    /// Stop the session.
    ///
    /// Returns the PID that was stopped, or `None` if no session was running.
    /// A stale PID file is removed either way.
    pub fn close(&self) -> Result<Option<u32>> {
        let pid = match self.status()? {
            SessionStatus::Closed => {
                tracing::debug!("No session to close");
                return Ok(None);
            }
            SessionStatus::Stale { pid } => {
                self.clear_stale(pid)?;
                return Ok(None);
            }
            SessionStatus::Open { pid } => pid,
        };

        terminate_process(pid);
        let stopped = wait_for(STOP_TIMEOUT, POLL_INTERVAL, || {
            (!is_process_alive(pid)).then_some(())
        });
        if stopped.is_none() {
            return Err(Error::EngineFailed {
                message: format!("lsyncd (pid {pid}) did not exit after SIGTERM"),
            });
        }

        io::remove_if_exists(&self.config.pid_path())?;
        tracing::info!(pid, "Session closed");
        Ok(Some(pid))
    }

    fn clear_stale(&self, pid: u32) -> Result<()> {
        tracing::warn!(pid, "Removing stale PID file");
        io::remove_if_exists(&self.config.pid_path())?;
        Ok(())
    }

    /// Launch lsyncd on the emitted config. lsyncd daemonizes, so the
    /// launched process exits once startup checks pass.
    fn start_engine(&self) -> Result<()> {
        let program = &self.config.binaries.lsyncd;
        let log_path = self.config.log_path();
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| tether_fs::Error::io(&log_path, e))?;
        let log_err = log
            .try_clone()
            .map_err(|e| tether_fs::Error::io(&log_path, e))?;

        tracing::debug!(program, config = %self.config.engine_config_path().display(), "Starting lsyncd");
        let status = Command::new(program)
            .arg(self.config.engine_config_path())
            .current_dir(&self.config.root)
            .stdin(Stdio::null())
            .stdout(log)
            .stderr(log_err)
            .status()
            .map_err(|e| Error::spawn(program, e))?;

        if !status.success() {
            return Err(Error::EngineFailed {
                message: format!(
                    "lsyncd exited with status {}; see {}",
                    exit_code(status),
                    log_path.display()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Binaries;
    use tempfile::TempDir;
    use tether_filter::RuleSource;

    fn controller(dir: &TempDir) -> SessionController {
        SessionController::new(SessionConfig {
            root: dir.path().to_path_buf(),
            state_dir: dir.path().join("state"),
            host: "builder".to_string(),
            remote_path: "app".to_string(),
            sources: RuleSource::defaults(),
            delay: 0.1,
            compress: true,
            binaries: Binaries::default(),
        })
    }

    #[test]
    fn no_pid_file_is_closed() {
        let dir = TempDir::new().unwrap();
        assert_eq!(controller(&dir).status().unwrap(), SessionStatus::Closed);
    }

    #[test]
    fn require_open_without_session_is_no_session() {
        let dir = TempDir::new().unwrap();
        let err = controller(&dir).require_open().unwrap_err();
        assert!(matches!(err, Error::NoSession { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn live_pid_is_open() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);
        io::write_atomic(&controller.config().pid_path(), std::process::id().to_string().as_bytes()).unwrap();

        assert_eq!(
            controller.status().unwrap(),
            SessionStatus::Open {
                pid: std::process::id()
            }
        );
        assert_eq!(controller.require_open().unwrap(), std::process::id());
    }

    #[cfg(unix)]
    #[test]
    fn dead_pid_is_stale_and_close_clears_it() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        io::write_atomic(&controller.config().pid_path(), pid.to_string().as_bytes()).unwrap();

        assert_eq!(controller.status().unwrap(), SessionStatus::Stale { pid });
        assert_eq!(controller.close().unwrap(), None);
        assert!(!controller.config().pid_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn refresh_removes_stale_pid_file() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        io::write_atomic(&controller.config().pid_path(), pid.to_string().as_bytes()).unwrap();

        assert_eq!(controller.refresh().unwrap(), SessionStatus::Stale { pid });
        assert_eq!(controller.status().unwrap(), SessionStatus::Closed);
        assert!(!controller.config().pid_path().exists());
    }

    #[test]
    fn close_without_session_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let controller = controller(&dir);
        assert_eq!(controller.close().unwrap(), None);
        assert_eq!(controller.close().unwrap(), None);
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let open = serde_json::to_value(SessionStatus::Open { pid: 7 }).unwrap();
        let closed = serde_json::to_value(SessionStatus::Closed).unwrap();
        assert_eq!(open, serde_json::json!({"state": "open", "pid": 7}));
        assert_eq!(closed, serde_json::json!({"state": "closed"}));
    }
}
