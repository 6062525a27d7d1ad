//! PID file handling and signalling for the background lsyncd process

use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use tether_fs::io;

use crate::Result;

/// Read a PID file. Missing or unparsable files yield `None`.
pub fn read_pid(path: &Path) -> Result<Option<u32>> {
    let Some(content) = io::read_optional_text(path)? else {
        return Ok(None);
    };
    match content.trim().parse::<u32>() {
        Ok(pid) if pid > 0 => Ok(Some(pid)),
        _ => {
            tracing::warn!(?path, "Ignoring malformed PID file");
            Ok(None)
        }
    }
}

/// Check if a process is still alive
pub fn is_process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        // kill -0 only checks existence
        Command::new("kill")
            .args(["-0", &pid.to_string()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        false
    }
}

/// Ask a process to exit with SIGTERM.
///
/// Returns whether the signal was delivered.
pub fn terminate_process(pid: u32) -> bool {
    #[cfg(unix)]
    {
        Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        false
    }
}

/// Poll `check` every `interval` until it returns `Some` or `timeout` passes.
pub fn wait_for<T>(timeout: Duration, interval: Duration, mut check: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = check() {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_pid_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_pid(&dir.path().join("none.pid")).unwrap(), None);
    }

    #[test]
    fn read_pid_parses_trimmed_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsyncd.pid");
        std::fs::write(&path, "4242\n").unwrap();
        assert_eq!(read_pid(&path).unwrap(), Some(4242));
    }

    #[test]
    fn read_pid_malformed_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsyncd.pid");
        std::fs::write(&path, "not a pid").unwrap();
        assert_eq!(read_pid(&path).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn current_process_is_alive() {
        assert!(is_process_alive(std::process::id()));
    }

    #[cfg(unix)]
    #[test]
    fn terminated_child_is_not_alive() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = child.id();
        assert!(terminate_process(pid));
        child.wait().unwrap();
        assert!(!is_process_alive(pid));
    }

    #[test]
    fn wait_for_returns_first_value() {
        let mut calls = 0;
        let result = wait_for(Duration::from_secs(1), Duration::from_millis(1), || {
            calls += 1;
            (calls == 3).then_some(calls)
        });
        assert_eq!(result, Some(3));
    }

    #[test]
    fn wait_for_times_out() {
        let result: Option<()> = wait_for(Duration::from_millis(20), Duration::from_millis(5), || None);
        assert_eq!(result, None);
    }
}
