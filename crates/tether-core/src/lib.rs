//! Session orchestration for tether
//!
//! Wires the filter compiler, the transfer lock and the lsyncd process
//! together:
//!
//! - **Settings**: layered resolution into an immutable [`SessionConfig`]
//! - **Emitter**: renders the lsyncd configuration and rsync shim
//! - **Session**: opens, inspects and closes the background lsyncd process
//! - **Transfer / remote**: the two sides of the transfer lock protocol
//!
//! # Architecture
//!
//! ```text
//!                 tether-cli
//!                     |
//!                tether-core
//!                     |
//!        +------------+------------+
//!        |            |            |
//! tether-filter   tether-git   tether-fs
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod process;
pub mod remote;
pub mod session;
pub mod transfer;

pub use config::{Binaries, ConfigResolver, SessionConfig, Settings};
pub use emitter::ConfigEmitter;
pub use error::{Error, Result};
pub use remote::RemoteCommand;
pub use session::{SessionController, SessionStatus};
pub use transfer::run_transfer_round;
