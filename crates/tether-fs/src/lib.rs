//! Filesystem primitives for tether
//!
//! Provides forward-slash path handling, atomic writes of session files,
//! and the advisory lock that coordinates transfer rounds with remote
//! commands.

pub mod constants;
pub mod error;
pub mod io;
pub mod lock;
pub mod path;

pub use constants::SessionPath;
pub use error::{Error, Result};
pub use lock::{BarrierPass, SharedHold, SyncLock};
pub use path::NormalizedPath;
