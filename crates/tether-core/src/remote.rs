//! Running a command on the remote mirror
//!
//! The command starts only after the exclusive barrier on the transfer lock
//! has been passed, so every transfer round that began before the request
//! has finished.

use std::process::{Command, Stdio};

use tether_fs::BarrierPass;

use crate::session::SessionController;
use crate::transfer::exit_code;
use crate::{Error, Result};

/// A command to run in the remote mirror directory over ssh.
#[derive(Debug)]
pub struct RemoteCommand<'a> {
    session: &'a SessionController,
    args: Vec<String>,
    tty: bool,
}

impl<'a> RemoteCommand<'a> {
    /// Words of the command line are joined with spaces, as ssh does.
    pub fn new(session: &'a SessionController, args: Vec<String>) -> Self {
        Self {
            session,
            args,
            tty: false,
        }
    }

    /// Request a remote terminal (`ssh -t`).
    pub fn tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }

    /// The shell line executed on the remote host.
    pub fn remote_line(&self) -> String {
        let remote_path = &self.session.config().remote_path;
        format!("cd {} && {}", shell_words::quote(remote_path), self.args.join(" "))
    }

    /// Arguments passed to ssh.
    pub fn ssh_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3);
        if self.tty {
            args.push("-t".to_string());
        }
        args.push(self.session.config().host.clone());
        args.push(self.remote_line());
        args
    }

    /// Wait for in-flight transfers, then run the command.
    ///
    /// `on_wait` is called once if the barrier has to wait. Returns the
    /// remote command's exit code as reported by ssh.
    ///
    /// # Errors
    ///
    /// [`Error::NoSession`] if no session is open, a coordination error if
    /// the transfer lock is unusable.
    pub fn run(&self, on_wait: impl FnOnce()) -> Result<i32> {
        if self.args.is_empty() {
            return Err(Error::configuration("no remote command given"));
        }
        self.session.require_open()?;

        let pass = self.session.config().lock().barrier(on_wait)?;
        if pass == BarrierPass::Waited {
            tracing::info!("In-flight transfers finished");
        }

        let ssh = &self.session.config().binaries.ssh;
        tracing::debug!(ssh, line = %self.remote_line(), "Running remote command");
        let status = Command::new(ssh)
            .args(self.ssh_args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::spawn(ssh, e))?;

        Ok(exit_code(status))
    }
}
