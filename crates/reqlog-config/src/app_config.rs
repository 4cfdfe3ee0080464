//! Application configuration structures.

use crate::LoggingOptions;
use reqlog_core::telemetry::LogFormatConfig;
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Log subscriber configuration.
    #[serde(default)]
    pub telemetry: LogFormatConfig,

    /// Logging middleware configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Request/response logging middleware options.
    #[serde(default)]
    pub request_response: LoggingOptions,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns the HTTP server address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
