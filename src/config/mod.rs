//! Configuration management for Rappit.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from the "rappit" key of a settings document and merged with defaults.

pub mod schema;

pub use schema::AppConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;

/// Key of the settings section this crate reads.
pub const SETTINGS_KEY: &str = "rappit";

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated when settings change.
static CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| RwLock::new(AppConfig::default()));

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The merged configuration failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a settings JSON value.
///
/// This function reads the "rappit" section, merges it with defaults,
/// validates the result, and updates the global configuration. A section
/// that does not deserialize is logged and ignored.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under the "rappit" key
///
/// # Returns
///
/// `Ok(AppConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use rappit::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rappit": {
///         "timeout": 60000,
///         "validateSsl": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();

    if let Some(section) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<AppConfig>(section.clone()) {
            Ok(user_config) => config = config.merge(&user_config),
            Err(e) => {
                log::warn!("Failed to parse {} settings: {}. Using defaults.", SETTINGS_KEY, e)
            }
        }
    }

    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Loads configuration from a JSON settings file.
///
/// The file holds a settings document with a "rappit" section, as accepted
/// by [`load_config`].
pub fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    log::debug!("loading settings from {}", path.display());

    let text = std::fs::read_to_string(path)?;
    let settings: Value = serde_json::from_str(&text)?;
    load_config(Some(settings))
}

/// Gets the current global configuration.
///
/// If configuration has not been loaded yet, returns the default configuration.
pub fn get_config() -> AppConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| AppConfig::default())
}

/// Updates a specific configuration setting.
///
/// An update that leaves the configuration invalid is logged and the
/// configuration is reset to defaults.
///
/// # Example
///
/// ```no_run
/// use rappit::config::update_config;
///
/// update_config(|config| {
///     config.timeout = 60000;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut AppConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("Configuration validation failed after update: {}", e);
            *config = AppConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = AppConfig::default();
    }
}
