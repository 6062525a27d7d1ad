//! Shared test utilities for the tether workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git repository fixtures
//! - [`tree`] - [`tree::TestTree`] builder for working tree scenarios

pub mod git;
pub mod tree;
