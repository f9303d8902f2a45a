//! Global configuration models for `.pushtrack/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls how trackers behave on a page.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

use crate::subscription_models::REGISTRATION_TOPIC;

/// Represents global settings from `.pushtrack/config.toml`.
///
/// # Example
///
/// ```toml
/// # .pushtrack/config.toml
/// [tracker]
/// rearm_close_handler = true
/// report_connection_loss = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct GlobalConfig {
    /// Settings applied to every pipeline tracker.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Settings for a pipeline tracker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct TrackerConfig {
    /// Topic the tracker subscribes to, scoped by game id.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Install a fresh close handler after each reconnect.
    ///
    /// When disabled only the first disconnect is repaired, which covers the
    /// connection being dropped by the submitting request.
    #[serde(default)]
    pub rearm_close_handler: bool,

    /// Show "Connection Lost" when a reconnect attempt fails.
    ///
    /// When disabled the indicator silently stays at its last waypoint.
    #[serde(default)]
    pub report_connection_loss: bool,
}

fn default_topic() -> String {
    REGISTRATION_TOPIC.to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            rearm_close_handler: false,
            report_connection_loss: false,
        }
    }
}
