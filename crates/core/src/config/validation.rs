//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `api_base_url` is empty or not an absolute http(s) URL
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `poll_interval_ms` is less than 100ms
    /// - `max_polls` is 0 or exceeds 10000
    /// - `default_ttl_secs` is 0
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "api_base_url".into(),
                reason: "must be an absolute http(s) URL".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.poll_interval_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }

        if self.max_polls == 0 {
            return Err(ConfigError::Invalid { field: "max_polls".into(), reason: "must be greater than 0".into() });
        }
        if self.max_polls > 10_000 {
            return Err(ConfigError::Invalid { field: "max_polls".into(), reason: "must not exceed 10000".into() });
        }

        if self.default_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "default_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let config = AppConfig { api_base_url: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_relative_base_url() {
        let config = AppConfig { api_base_url: "localhost:8000/api".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_poll_interval_too_small() {
        let config = AppConfig { poll_interval_ms: 10, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "poll_interval_ms"));
    }

    #[test]
    fn test_validate_max_polls_zero() {
        let config = AppConfig { max_polls: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_polls"));
    }

    #[test]
    fn test_validate_max_polls_exceeds_limit() {
        let config = AppConfig { max_polls: 10_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_polls"));
    }

    #[test]
    fn test_validate_ttl_zero() {
        let config = AppConfig { default_ttl_secs: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "default_ttl_secs"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, poll_interval_ms: 100, max_polls: 1, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
