//! Settings resolution
//!
//! Settings are merged from these layers (later layers override earlier):
//!
//! 1. **Global** - `<config_dir>/tether/config.toml`
//! 2. **Tree** - `.tether.toml` at the working tree root
//! 3. **Git config** - `tether.*` keys (`tether.host`, `tether.remotePath`,
//!    `tether.ignore`, `tether.delay`, `tether.compress`, `tether.lsyncd`,
//!    `tether.rsync`, `tether.ssh`)
//!
//! The result is captured once into a [`SessionConfig`] and passed to every
//! component instead of being read from the environment later.
//!
//! # Example
//!
//! ```ignore
//! use tether_core::config::ConfigResolver;
//! use tether_git::GitWorkspace;
//!
//! let workspace = GitWorkspace::discover(&std::env::current_dir()?)?;
//! let config = ConfigResolver::new(&workspace).resolve()?;
//! println!("Target: {}", config.target());
//! ```

mod resolver;
mod settings;

pub use resolver::{ConfigResolver, DEFAULT_DELAY, SessionConfig, validate_host};
pub use settings::{BinarySettings, Binaries, Settings};
