//! # pt-protocol
//!
//! Core protocol definitions and data models for pushtrack.
//!
//! This crate defines all shared data structures used for:
//! - Lifecycle events pushed by the server for a submitted test
//! - Topic subscriptions scoping those events to one game
//! - Progress waypoints rendered by the page
//! - Configuration and replay scenario files
//!
//! ## Modules
//!
//! - [`event_models`]: Correlation ids and lifecycle events
//! - [`subscription_models`]: Topic subscriptions
//! - [`progress_models`]: Progress state and stage waypoints
//! - [`config_models`]: Global configuration from config.toml
//! - [`scenario_models`]: Replay scenarios from `scenarios/*.yaml`
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde and ts-rs
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other pushtrack crates

pub mod config_models;
pub mod event_models;
pub mod progress_models;
pub mod scenario_models;
pub mod subscription_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use event_models::*;
pub use progress_models::*;
pub use scenario_models::*;
pub use subscription_models::*;
