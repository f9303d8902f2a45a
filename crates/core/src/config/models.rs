//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and replay scenarios into a single configuration object.

use pt_protocol::config_models::GlobalConfig;
use pt_protocol::scenario_models::Scenario;

/// Unified application configuration loaded from `.pushtrack/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `scenarios/*.yaml`: Replay scenarios
///
/// # Example
///
/// ```rust,no_run
/// use pt_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} scenarios", config.scenarios.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All scenarios loaded from `scenarios/*.yaml`, sorted by file name.
    pub scenarios: Vec<Scenario>,
}

impl AppConfig {
    /// Look up a scenario by name.
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
