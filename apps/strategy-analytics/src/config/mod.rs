//! Configuration loading for strategy analytics.
//!
//! Provides YAML loading, validation, and environment variable
//! interpolation. Every section has defaults, so an empty document (or no
//! file at all) is a valid configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_analytics::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("data directory: {}", config.data.directory);
//! ```

mod comparator;
mod data;
mod export;
mod metrics;
mod observability;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use comparator::ComparatorConfig;
pub use data::DataConfig;
pub use export::ExportConfig;
pub use metrics::MetricsConfig;
pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Input data location and loader limits.
    #[serde(default)]
    pub data: DataConfig,
    /// Metrics engine settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Comparator parallelism.
    #[serde(default)]
    pub comparator: ComparatorConfig,
    /// Export output settings.
    #[serde(default)]
    pub export: ExportConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is a literal and always valid
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// A delimiter setting as a byte, `None` unless it is exactly one ASCII character.
fn delimiter_byte(value: &str) -> Option<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Some(*b),
        _ => None,
    }
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.data.extension.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.extension must not be empty".to_string(),
        ));
    }

    if config.data.max_rows == 0 {
        return Err(ConfigError::ValidationError(
            "data.max_rows must be positive".to_string(),
        ));
    }

    if config.data.delimiter_byte().is_none() {
        return Err(ConfigError::ValidationError(
            "data.delimiter must be a single ASCII character".to_string(),
        ));
    }

    if config.metrics.periods_per_year == 0 {
        return Err(ConfigError::ValidationError(
            "metrics.periods_per_year must be positive".to_string(),
        ));
    }

    let rf = config.metrics.risk_free_rate;
    if !(0.0..=1.0).contains(&rf) {
        return Err(ConfigError::ValidationError(
            "metrics.risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.comparator.min_parallel_jobs == 0 {
        return Err(ConfigError::ValidationError(
            "comparator.min_parallel_jobs must be at least 1".to_string(),
        ));
    }

    if config.export.delimiter_byte().is_none() {
        return Err(ConfigError::ValidationError(
            "export.delimiter must be a single ASCII character".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}
