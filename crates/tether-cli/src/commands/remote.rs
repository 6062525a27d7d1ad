//! Remote command execution

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use tether_core::RemoteCommand;

use crate::context::SessionContext;
use crate::error::Result;

/// Run `command` in the remote mirror and return its exit code
pub fn run_remote(cwd: &Path, command: Vec<String>, no_tty: bool) -> Result<i32> {
    let ctx = SessionContext::load(cwd)?;
    let tty = !no_tty && std::io::stdin().is_terminal();

    let code = RemoteCommand::new(&ctx.session, command)
        .tty(tty)
        .run(|| {
            eprintln!(
                "{} Waiting for in-flight transfers to finish...",
                "..".yellow().bold()
            );
        })?;
    Ok(code)
}
