//! Logging System
//!
//! Structured logging using the `tracing` crate. Logs always go to stderr so
//! that stdout carries nothing but the comparison report.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full filter directive, overriding config
pub const LOG_ENV_VAR: &str = "IMGDIFF_LOG";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_format(&self.format)?;
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(format!(
                "Invalid log level: {} (must be trace, debug, info, warn, error or off)",
                other
            )),
        }
    }
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. `IMGDIFF_LOG` environment variable
/// 2. CLI flags (already folded into `config`)
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_env_filter(config);
    validate_format(&config.format).map_err(ConfigError::Logging)?;

    let base_subscriber = Registry::default().with(filter);

    let result = if config.format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

/// Build environment filter from the environment or config
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return filter;
    }

    if config.level == "off" {
        return EnvFilter::new("off");
    }

    EnvFilter::new(&config.level)
}

fn validate_format(format: &str) -> Result<(), String> {
    if format != "json" && format != "text" {
        return Err(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ));
    }
    Ok(())
}
