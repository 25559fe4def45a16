//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STUDIA_*)
//! 2. TOML config file (if STUDIA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STUDIA_*)
/// 2. TOML config file (if STUDIA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend API.
    ///
    /// Set via STUDIA_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via STUDIA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via STUDIA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Interval between job status polls in milliseconds.
    ///
    /// Set via STUDIA_POLL_INTERVAL_MS environment variable.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of status polls per job before giving up.
    ///
    /// Set via STUDIA_MAX_POLLS environment variable. Together with
    /// `poll_interval_ms` this bounds the total wait (300 polls at 2s is
    /// a 10 minute ceiling).
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    /// Default cache TTL in seconds for reads that don't pick a tier.
    ///
    /// Set via STUDIA_DEFAULT_TTL_SECS environment variable.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".into()
}

fn default_user_agent() -> String {
    "studia/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_max_polls() -> u32 {
    300
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Request timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Default cache TTL as Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `STUDIA_`
    /// 2. TOML file from `STUDIA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("STUDIA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("STUDIA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
