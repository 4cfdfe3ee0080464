//! Configuration validation module.
//!
//! Fails fast on values the middleware cannot work with, instead of
//! discovering them on the first request.

use crate::{AppConfig, LoggingOptions, ServerConfig};
use std::fmt;
use tracing::warn;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { value: u16 },
    /// Correlation header name is empty or not an HTTP token.
    InvalidHeaderName { value: String },
    /// An ignored path prefix is empty and would bypass every request.
    EmptyIgnoredPath { index: usize },
    /// A sensitive field name is blank.
    BlankSensitiveField { index: usize },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { value } => {
                write!(f, "Invalid server port: {} (must be 1-65535)", value)
            }
            Self::InvalidHeaderName { value } => {
                write!(f, "Invalid correlation id header name: '{}'", value)
            }
            Self::EmptyIgnoredPath { index } => {
                write!(f, "Ignored path at index {} is empty", index)
            }
            Self::BlankSensitiveField { index } => {
                write!(f, "Sensitive field at index {} is blank", index)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        Self::validate_options(&config.logging.request_response, &mut result);

        result.into_result()
    }

    /// Validates the middleware options alone.
    pub fn validate_logging(options: &LoggingOptions) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();
        Self::validate_options(options, &mut result);
        result.into_result()
    }

    fn validate_server(config: &ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort { value: config.port });
        }
    }

    fn validate_options(options: &LoggingOptions, result: &mut ValidationResult) {
        if !is_header_token(&options.correlation_id_header) {
            result.add_error(ConfigValidationError::InvalidHeaderName {
                value: options.correlation_id_header.clone(),
            });
        }

        for (index, path) in options.ignored_paths.iter().enumerate() {
            if path.is_empty() {
                result.add_error(ConfigValidationError::EmptyIgnoredPath { index });
            }
        }

        for (index, field) in options.sensitive_fields.iter().enumerate() {
            if field.trim().is_empty() {
                result.add_error(ConfigValidationError::BlankSensitiveField { index });
            }
        }

        if options.mask_sensitive_data && options.sensitive_fields.is_empty() {
            warn!("Sensitive data masking is enabled but no sensitive fields are configured");
        }
    }
}

/// RFC 9110 `token`: one or more tchar.
fn is_header_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}
