//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `brewd.toml` in the working directory (or the path named by
//! `BREWD_CONFIG`). Every field has a default so the file is optional;
//! with no file the rig is simply empty. Environment variables take
//! precedence over file values.

use brewery_adapter_telegram::TelegramConfig;
use brewery_app::rig::RigSpec;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Polling loop settings.
    pub controller: ControllerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Telegram channel settings; an empty token disables the channel.
    pub telegram: TelegramConfig,
    /// The `sensors` and `active_elements` sections.
    #[serde(flatten)]
    pub rig: RigSpec,
}

/// Polling loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Seconds to sleep between poll cycles.
    pub poll_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the TOML file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed, or if a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("BREWD_CONFIG").unwrap_or_else(|_| "brewd.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BREWD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("BREWD_TELEGRAM_TOKEN") {
            self.telegram.token = val;
        }
        if let Ok(val) = std::env::var("BREWD_POLL_INTERVAL_SECS")
            && let Ok(secs) = val.parse()
        {
            self.controller.poll_interval_secs = secs;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "brewd=info,brewery=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
