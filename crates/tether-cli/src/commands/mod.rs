//! Command implementations for tether-cli

pub mod config;
pub mod filters;
pub mod remote;
pub mod session;
pub mod transfer;

pub use config::run_config;
pub use filters::run_filters;
pub use remote::run_remote;
pub use session::{run_close, run_open, run_status};
pub use transfer::run_transfer;
