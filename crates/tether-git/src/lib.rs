//! Git working tree access for tether
//!
//! Locates the working tree root and git directory, enumerates the ignore
//! files tracked in the index, and reads settings from git config.

pub mod error;
pub mod workspace;

pub use error::{Error, Result};
pub use workspace::GitWorkspace;
