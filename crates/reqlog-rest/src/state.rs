//! Shared state of the logging middleware.

use crate::{LogSink, TracingLogSink};
use axum::http::HeaderName;
use reqlog_config::{ConfigLoader, ConfigValidator, LoggingOptions};
use reqlog_core::{ReqlogError, ReqlogResult, SensitiveDataMasker};
use std::sync::Arc;
use tracing::debug;

/// Everything the middleware needs, built once and shared by every exchange.
#[derive(Clone)]
pub struct LoggingState {
    options: Arc<LoggingOptions>,
    masker: Arc<SensitiveDataMasker>,
    correlation_header: HeaderName,
    sink: Arc<dyn LogSink>,
}

impl LoggingState {
    /// Creates a state that logs through `tracing`.
    pub fn new(options: LoggingOptions) -> ReqlogResult<Self> {
        Self::with_sink(options, Arc::new(TracingLogSink))
    }

    /// Creates a state that logs to `sink`.
    pub fn with_sink(options: LoggingOptions, sink: Arc<dyn LogSink>) -> ReqlogResult<Self> {
        ConfigValidator::validate_logging(&options).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            ReqlogError::Validation(message)
        })?;

        let correlation_header = HeaderName::from_bytes(options.correlation_id_header.as_bytes())
            .map_err(|e| {
                ReqlogError::InvalidHeader(format!("{}: {}", options.correlation_id_header, e))
            })?;

        debug!(
            correlation_header = %correlation_header,
            ignored_paths = ?options.ignored_paths,
            mask_sensitive_data = options.mask_sensitive_data,
            "Request/response logging configured"
        );

        Ok(Self {
            masker: Arc::new(SensitiveDataMasker::new(&options.sensitive_fields)),
            options: Arc::new(options),
            correlation_header,
            sink,
        })
    }

    /// Loads options from `section`, applies `configure`, and builds the state.
    pub fn from_loader<F>(loader: &ConfigLoader, section: &str, configure: F) -> ReqlogResult<Self>
    where
        F: FnOnce(&mut LoggingOptions),
    {
        Self::new(loader.load_logging_options_with(section, configure)?)
    }

    /// Replaces the sink.
    #[must_use]
    pub fn sink_to(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &LoggingOptions {
        &self.options
    }

    pub fn masker(&self) -> &SensitiveDataMasker {
        &self.masker
    }

    /// Parsed form of `options().correlation_id_header`.
    pub fn correlation_header(&self) -> &HeaderName {
        &self.correlation_header
    }

    pub fn sink(&self) -> &dyn LogSink {
        &*self.sink
    }
}
