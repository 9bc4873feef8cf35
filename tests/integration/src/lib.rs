//! Integration test utilities for the comment board
//!
//! Spawns the real API on an ephemeral port and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
