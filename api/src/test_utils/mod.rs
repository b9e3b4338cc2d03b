//! Test utilities
//!
//! In-memory port implementations, fixtures, and an HTTP harness that drives
//! the full router against them.

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
