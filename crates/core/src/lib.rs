//! # pt-core
//!
//! Progress tracking for test submissions observed over a push channel.
//!
//! This crate provides:
//! - The push channel contract and an in-memory implementation
//! - The progress model rendered by the page
//! - The pipeline tracker state machine and its reconnect protocol
//! - A board coordinating several trackers on one channel
//! - Configuration loading and scenario replay
//!
//! ## Modules
//!
//! - [`channel`]: Push channel trait and `LocalChannel`
//! - [`progress`]: Progress model
//! - [`tracker`]: Pipeline tracker
//! - [`board`]: Multi-tracker page state
//! - [`config`]: Configuration loading and management
//! - [`scenario`]: Scenario replay

pub mod board;
pub mod channel;
pub mod config;
pub mod progress;
pub mod scenario;
pub mod tracker;
