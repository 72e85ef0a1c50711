//! Scheduler API connection settings.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Base URL of the receptor API, e.g. `http://receptor.192.168.11.11.xip.io`.
    #[serde(default)]
    pub url: String,

    /// Basic-auth user; auth is disabled when empty.
    #[serde(default)]
    pub username: String,

    /// Loaded from `APPRUNNER_SCHEDULER_PASSWORD` at runtime.
    #[serde(skip)]
    pub password: Option<String>,

    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl SchedulerConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Basic-auth credentials, if a username is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        if self.username.is_empty() {
            None
        } else {
            Some((self.username.as_str(), self.password.as_deref()))
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scheduler.url",
            });
        }

        let parsed = Url::parse(&self.url).map_err(|e| ConfigError::InvalidValue {
            field: "scheduler.url",
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.url",
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
