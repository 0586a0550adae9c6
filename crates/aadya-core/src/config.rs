//! Configuration loading and typed config structures for the assessment.
//!
//! The configuration lives in an optional `aadya-config.yaml`. Every field
//! has a default, so an empty file (or no file at all) yields a working
//! setup against a backend on `localhost:3001`.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level assessment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssessmentConfig {
    /// Backend API connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Motor game tuning.
    #[serde(default)]
    pub motor: MotorConfig,

    /// Score chart settings.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AssessmentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the backend:
    /// - `AADYA_API_URL` overrides `backend.api_url`
    /// - `AADYA_REQUEST_TIMEOUT_MS` overrides `backend.request_timeout_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.backend.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "backend.api_url must not be empty".to_owned(),
            });
        }
        if self.motor.hit_target == 0 {
            return Err(ConfigError::Invalid {
                reason: "motor.hit_target must be at least 1".to_owned(),
            });
        }
        if self.motor.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "motor.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.motor.spawn_range_percent == 0 || self.motor.spawn_range_percent > 100 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "motor.spawn_range_percent must be in 1..=100, got {}",
                    self.motor.spawn_range_percent
                ),
            });
        }
        Ok(())
    }
}

/// Backend API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the assessment REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl BackendConfig {
    /// Apply `AADYA_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AADYA_API_URL") {
            self.api_url = val;
        }
        if let Ok(val) = std::env::var("AADYA_REQUEST_TIMEOUT_MS") {
            match val.parse() {
                Ok(ms) => self.request_timeout_ms = ms,
                Err(e) => warn!(value = val, error = %e, "ignoring invalid AADYA_REQUEST_TIMEOUT_MS"),
            }
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Motor game tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MotorConfig {
    /// Catches needed to finish the game.
    #[serde(default = "default_hit_target")]
    pub hit_target: u8,

    /// Milliseconds between elapsed-time ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Ball coordinates are drawn from `0..spawn_range_percent`, keeping the
    /// ball off the far edges of the play area.
    #[serde(default = "default_spawn_range_percent")]
    pub spawn_range_percent: u8,

    /// Fixed RNG seed for reproducible ball placement. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            hit_target: default_hit_target(),
            tick_interval_ms: default_tick_interval_ms(),
            spawn_range_percent: default_spawn_range_percent(),
            seed: None,
        }
    }
}

/// Score chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Dimension names used when the backend sends no usable label.
    #[serde(default = "default_fallback_labels")]
    pub fallback_labels: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fallback_labels: default_fallback_labels(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_api_url() -> String {
    "http://127.0.0.1:3001".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_hit_target() -> u8 {
    5
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_spawn_range_percent() -> u8 {
    80
}

fn default_fallback_labels() -> Vec<String> {
    crate::score::DEFAULT_FALLBACK_LABELS
        .iter()
        .map(|label| (*label).to_owned())
        .collect()
}

fn default_log_level() -> String {
    "info".to_owned()
}
