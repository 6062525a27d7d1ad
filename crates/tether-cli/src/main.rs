//! tether CLI
//!
//! Keeps a remote mirror of a git working tree in sync and runs commands
//! on it.

mod cli;
mod commands;
mod context;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns the process exit code.
fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} keeps a remote mirror in sync", "tether".green().bold());
            println!();
            println!("Run {} for available commands.", "tether --help".cyan());
            Ok(0)
        }
    }
}

fn execute_command(cmd: Commands) -> Result<i32> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Open => commands::run_open(&cwd).map(|()| 0),
        Commands::Close => commands::run_close(&cwd).map(|()| 0),
        Commands::Status { json } => commands::run_status(&cwd, json).map(|()| 0),
        Commands::Run { no_tty, command } => commands::run_remote(&cwd, command, no_tty),
        Commands::Filters { json } => commands::run_filters(&cwd, json).map(|()| 0),
        Commands::Config => commands::run_config(&cwd).map(|()| 0),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tether", &mut io::stdout());
            Ok(0)
        }
        Commands::Transfer { lock, rsync, args } => commands::run_transfer(lock, &rsync, &args),
    }
}
