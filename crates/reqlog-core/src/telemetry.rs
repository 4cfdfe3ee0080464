//! Logging subscriber setup.
//!
//! Installs the `tracing` subscriber that receives the exchange records,
//! either as human-readable lines or as JSON objects.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ReqlogResult;
use serde::{Deserialize, Serialize};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Log subscriber configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFormatConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_directive")]
    pub default_directive: String,

    /// Whether to print event targets.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_directive() -> String {
    "info,reqlog=debug,http=info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for LogFormatConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_directive: default_directive(),
            with_target: default_with_target(),
        }
    }
}

/// Initialize the global `tracing` subscriber.
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "telemetry")]
pub fn init_logging(config: &LogFormatConfig) -> ReqlogResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target),
            )
            .try_init(),
    };

    result.map_err(|e| crate::ReqlogError::Internal(format!("Failed to install subscriber: {}", e)))?;

    tracing::debug!(format = ?config.format, "Logging initialized");
    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_config: &LogFormatConfig) -> ReqlogResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogFormatConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.default_directive.starts_with("info"));
        assert!(config.with_target);
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let config: LogFormatConfig = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_directive, default_directive());
    }
}
