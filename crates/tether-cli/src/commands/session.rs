//! open, close and status

use std::path::Path;

use colored::Colorize;
use tether_core::SessionStatus;

use crate::context::SessionContext;
use crate::error::Result;

/// Run the open command
pub fn run_open(cwd: &Path) -> Result<()> {
    let ctx = SessionContext::load(cwd)?;
    let tether_exe = std::env::current_exe()?;
    let config = ctx.session.config();

    println!(
        "{} {} -> {}",
        "=>".blue().bold(),
        config.root.display(),
        config.target().cyan()
    );
    let pid = ctx.session.open(&ctx.workspace, &tether_exe)?;
    println!("{} Session open (lsyncd pid {})", "OK".green().bold(), pid);
    println!("   Log: {}", config.log_path().display().to_string().dimmed());
    Ok(())
}

/// Run the close command
pub fn run_close(cwd: &Path) -> Result<()> {
    let ctx = SessionContext::load(cwd)?;

    match ctx.session.close()? {
        Some(pid) => println!("{} Session closed (lsyncd pid {})", "OK".green().bold(), pid),
        None => println!("{}", "No open session".dimmed()),
    }
    Ok(())
}

/// Run the status command
pub fn run_status(cwd: &Path, json: bool) -> Result<()> {
    let ctx = SessionContext::load(cwd)?;
    let config = ctx.session.config();
    let status = ctx.session.refresh()?;

    if json {
        let output = serde_json::json!({
            "root": config.root,
            "target": config.target(),
            "session": status,
            "pid_file": config.pid_path(),
            "log_file": config.log_path(),
            "lock_file": config.lock_path(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Session Status".bold());
    println!();
    println!("{}:   {}", "Root".dimmed(), config.root.display());
    println!("{}: {}", "Target".dimmed(), config.target().cyan());
    let state = match status {
        SessionStatus::Open { pid } => format!("{} (lsyncd pid {})", "open".green(), pid),
        SessionStatus::Stale { pid } => format!(
            "{} (lsyncd pid {} is gone, PID file removed)",
            "closed".yellow(),
            pid
        ),
        SessionStatus::Closed => "closed".yellow().to_string(),
    };
    println!("{}:  {}", "State".dimmed(), state);
    println!("{}:    {}", "Log".dimmed(), config.log_path().display());
    Ok(())
}
