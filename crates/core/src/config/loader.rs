//! Configuration file loader for `.pushtrack/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.pushtrack/` directory, including:
//! - `config.toml`: Global settings
//! - `scenarios/*.yaml`: Replay scenarios

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use pt_protocol::config_models::GlobalConfig;
use pt_protocol::scenario_models::Scenario;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".pushtrack";

/// Loads all configuration from the `.pushtrack/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.pushtrack/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns an empty/default configuration
/// rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or YAML)
/// - The tracker topic is empty or two scenarios share a name
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let pt_dir = root.join(CONFIG_DIR);

    // If .pushtrack doesn't exist, return default config
    if !pt_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&pt_dir)?;
    let scenarios = load_scenarios(&pt_dir)?;

    debug!(
        root = %root.display(),
        scenarios = scenarios.len(),
        "loaded configuration"
    );

    Ok(AppConfig { global, scenarios })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(pt_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = pt_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.tracker.topic.trim().is_empty() {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "tracker.topic must not be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads all scenario definitions from `scenarios/*.yaml`.
fn load_scenarios(pt_dir: &Path) -> ConfigResult<Vec<Scenario>> {
    let scenarios_dir = pt_dir.join("scenarios");

    if !scenarios_dir.exists() {
        return Ok(Vec::new());
    }

    let mut scenarios = Vec::new();
    let mut names = HashSet::new();

    for entry in WalkDir::new(&scenarios_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: scenarios_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario: Scenario =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        if !names.insert(scenario.name.clone()) {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("duplicate scenario name '{}'", scenario.name),
            });
        }

        scenarios.push(scenario);
    }

    Ok(scenarios)
}
