//! Configuration types.

use boreas_telemetry::{LogConfig, MetricsConfig, TelemetryConfig};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete Boreas application configuration.
///
/// # Example
///
/// ```
/// use boreas_config::BoreasConfig;
///
/// let config = BoreasConfig::default();
/// assert_eq!(config.logging.level, "info");
/// assert!(config.metrics.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BoreasConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Request handling limits.
    #[serde(default)]
    pub request: RequestSection,
}

impl BoreasConfig {
    /// Development preset: debug level, pretty output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingSection {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ..LoggingSection::default()
            },
            ..Self::default()
        }
    }

    /// Production preset: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - The log level is empty
    /// - The body limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        if self.request.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "request.max_body_bytes",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Returns the telemetry settings derived from this configuration.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            logging: LogConfig::from(&self.logging),
            metrics: MetricsConfig {
                enabled: self.metrics.enabled,
            },
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable output.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingSection {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "boreas_resolve=debug").
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        let base = match section.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: section.enabled,
            level: section.level.clone(),
            ..base
        }
    }
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct MetricsSection {
    /// Whether resolver metrics are recorded.
    pub enabled: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Request handling section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct RequestSection {
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for RequestSection {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}
