//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality across all integration tests:
//! - Test fixtures (sample configs, scenarios)
//! - Custom assertions
//! - A recording push channel

pub mod assertions;
pub mod fixtures;
pub mod recording_channel;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use recording_channel::*;
