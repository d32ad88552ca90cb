//! Configuration schema for Rappit.
//!
//! This module defines the configuration structure and validation logic for
//! all user-configurable settings.

use crate::models::DEFAULT_CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure.
///
/// All settings are read from the "rappit" section of a settings document.
/// Missing settings fall back to sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Request timeout in milliseconds.
    ///
    /// Handed to the transport with every request. Defaults to 30000ms
    /// (30 seconds).
    ///
    /// Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to validate SSL/TLS certificates.
    ///
    /// Defaults to true.
    #[serde(default = "default_validate_ssl")]
    pub validate_ssl: bool,

    /// Maximum number of requests to keep in history.
    ///
    /// Defaults to 20. Must be > 0.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Content type assumed for request bodies without a Content-Type header.
    ///
    /// Also used as the formatter hint for the request body. Must not be empty.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,

    /// Headers a new request starts with.
    #[serde(default = "default_headers")]
    pub default_headers: HashMap<String, String>,

    /// Whether response bodies are pretty-printed when they arrive.
    ///
    /// When disabled the raw body is shown. Defaults to true.
    #[serde(default = "default_true")]
    pub auto_format_response: bool,

    /// Whether completed sends are recorded into history. Defaults to true.
    #[serde(default = "default_true")]
    pub save_history: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            validate_ssl: default_validate_ssl(),
            history_limit: default_history_limit(),
            default_content_type: default_content_type(),
            default_headers: default_headers(),
            auto_format_response: default_true(),
            save_history: default_true(),
        }
    }
}

impl AppConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.history_limit == 0 {
            return Err("historyLimit must be greater than 0".to_string());
        }

        if self.default_content_type.trim().is_empty() {
            return Err("defaultContentType must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    pub fn merge(&self, other: &AppConfig) -> Self {
        Self {
            timeout: other.timeout,
            validate_ssl: other.validate_ssl,
            history_limit: other.history_limit,
            default_content_type: other.default_content_type.clone(),
            default_headers: other.default_headers.clone(),
            auto_format_response: other.auto_format_response,
            save_history: other.save_history,
        }
    }
}

// Default value functions for serde

fn default_timeout() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_validate_ssl() -> bool {
    true
}

fn default_history_limit() -> usize {
    crate::history::MAX_HISTORY_ITEMS
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
    headers.insert("User-Agent".to_string(), "Rappit/1.0".to_string());
    headers.insert("Accept".to_string(), "*/*".to_string());
    headers
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.timeout, 30000);
        assert!(config.validate_ssl);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.default_content_type, "application/json");
        assert!(config.auto_format_response);
        assert!(config.save_history);
    }

    #[test]
    fn test_default_headers() {
        let config = AppConfig::default();
        assert_eq!(config.default_headers.len(), 3);
        assert_eq!(
            config.default_headers.get("User-Agent"),
            Some(&"Rappit/1.0".to_string())
        );
        assert_eq!(config.default_headers.get("Accept"), Some(&"*/*".to_string()));
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = AppConfig {
            timeout: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), "timeout must be greater than 0");
    }

    #[test]
    fn test_config_validation_zero_history_limit() {
        let config = AppConfig {
            history_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("historyLimit"));
    }

    #[test]
    fn test_config_validation_blank_content_type() {
        let config = AppConfig {
            default_content_type: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig {
            timeout: 1500,
            ..Default::default()
        };
        assert_eq!(config.timeout_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn test_deserialization_with_defaults() {
        let json = r#"{"historyLimit": 5, "saveHistory": false}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_limit, 5);
        assert!(!config.save_history);
        assert_eq!(config.timeout, 30000);
        assert_eq!(config.default_headers.len(), 3);
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(json["validateSsl"], true);
        assert_eq!(json["defaultContentType"], "application/json");
        assert_eq!(json["autoFormatResponse"], true);
    }
}
