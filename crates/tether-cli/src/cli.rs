//! CLI argument parsing using clap derive

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// tether - keep a remote mirror of your working tree in sync
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start syncing this working tree to the remote host
    ///
    /// Compiles the tree's ignore files into rsync filters, writes the lsyncd
    /// configuration and starts lsyncd in the background.
    Open,

    /// Stop the running session
    Close,

    /// Show session status
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Run a command in the remote mirror once in-flight transfers finish
    ///
    /// Examples:
    ///   tether run make -j8
    ///   tether run -- cargo test --workspace
    Run {
        /// Do not allocate a remote terminal
        #[arg(long)]
        no_tty: bool,

        /// Command and arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the compiled rsync filter rules
    Filters {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the lsyncd configuration a session would use
    Config,

    /// Generate shell completions
    ///
    /// Examples:
    ///   tether completions bash > ~/.local/share/bash-completion/completions/tether
    ///   tether completions zsh > ~/.zfunc/_tether
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Run one rsync transfer under the session's transfer lock (used by lsyncd)
    #[command(hide = true)]
    Transfer {
        /// Transfer lock file
        #[arg(long)]
        lock: PathBuf,

        /// rsync executable
        #[arg(long, default_value = "rsync")]
        rsync: String,

        /// Arguments passed through to rsync
        #[arg(last = true)]
        args: Vec<OsString>,
    },
}
