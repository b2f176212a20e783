//! Dashboard configuration.
//!
//! The front end reads it as JSON from the host page. Every field has a
//! default, so an absent or empty document is valid.

use std::time::Duration;

use serde::Deserialize;

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Device base URL. Empty means same origin.
    pub api_base: String,
    /// Per-request deadline, in milliseconds.
    pub request_timeout_ms: u64,
    /// Number of log lines shown on the system page.
    pub log_limit: usize,
    /// Delay before reloading the UI after a restart, in milliseconds.
    pub restart_reload_delay_ms: u64,
    /// Polling periods, in seconds.
    pub refresh: RefreshConfig,
}

/// Per-page polling periods, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub dashboard_secs: u64,
    pub sensors_secs: u64,
    pub relays_secs: u64,
    pub system_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            request_timeout_ms: 10_000,
            log_limit: 20,
            restart_reload_delay_ms: 3_000,
            refresh: RefreshConfig::default(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            dashboard_secs: 5,
            sensors_secs: 5,
            relays_secs: 5,
            system_secs: 10,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a JSON document. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.log_limit == 0 {
            return Err(ConfigError::Validation(
                "log_limit must be non-zero".to_string(),
            ));
        }
        let refresh = &self.refresh;
        if [
            refresh.dashboard_secs,
            refresh.sensors_secs,
            refresh.relays_secs,
            refresh.system_secs,
        ]
        .contains(&0)
        {
            return Err(ConfigError::Validation(
                "refresh periods must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn restart_reload_delay(&self) -> Duration {
        Duration::from_millis(self.restart_reload_delay_ms)
    }
}

impl RefreshConfig {
    #[must_use]
    pub fn dashboard(&self) -> Duration {
        Duration::from_secs(self.dashboard_secs)
    }

    #[must_use]
    pub fn sensors(&self) -> Duration {
        Duration::from_secs(self.sensors_secs)
    }

    #[must_use]
    pub fn relays(&self) -> Duration {
        Duration::from_secs(self.relays_secs)
    }

    #[must_use]
    pub fn system(&self) -> Duration {
        Duration::from_secs(self.system_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parse failure.
    #[error("failed to parse dashboard config")]
    Parse(#[from] serde_json::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
