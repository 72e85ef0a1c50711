//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `APPRUNNER_SCHEDULER_PASSWORD`.
//!
//! # Example
//!
//! ```no_run
//! use apprunner::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod logging;
mod scheduler;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub use logging::LoggingConfig;
pub use scheduler::SchedulerConfig;

/// Environment variable holding the scheduler's basic-auth password.
pub const PASSWORD_ENV: &str = "APPRUNNER_SCHEDULER_PASSWORD";

/// Main application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Domain suffix for app hostnames, e.g. `192.168.11.11.xip.io`.
    #[serde(default)]
    pub system_domain: String,

    /// Scheduler API connection settings.
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// The scheduler password is taken from `APPRUNNER_SCHEDULER_PASSWORD`,
    /// never from the file.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.scheduler.password = std::env::var(PASSWORD_ENV).ok();

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// `~/.apprunner/config.toml`, or `config.toml` when there is no home directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".apprunner").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.system_domain.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "system_domain",
            }
            .into());
        }
        if self.system_domain.starts_with('.') || self.system_domain.ends_with('.') {
            return Err(ConfigError::InvalidValue {
                field: "system_domain",
                reason: "must not start or end with '.'".to_string(),
            }
            .into());
        }
        self.scheduler.validate()?;
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
