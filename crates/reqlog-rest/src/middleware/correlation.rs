//! Correlation id resolution.

use axum::http::HeaderMap;
use reqlog_config::LoggingOptions;
use uuid::Uuid;

/// Headers checked, in order, after the configured correlation header.
pub const FALLBACK_CORRELATION_HEADERS: [&str; 4] =
    ["X-Request-ID", "Correlation-Id", "Request-Id", "traceparent"];

/// Outcome of resolving the correlation id of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationResolution {
    /// Resolved id; empty when correlation is not tracked.
    pub id: String,
    /// True when the id was generated here and must be echoed on the response.
    pub set_response_header: bool,
}

impl CorrelationResolution {
    /// Returns true when the exchange carries a correlation id.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Reuses an inbound correlation id or generates a new one.
///
/// Header lookups are case-insensitive. A reused id is never echoed back.
#[must_use]
pub fn resolve(headers: &HeaderMap, options: &LoggingOptions) -> CorrelationResolution {
    if options.use_existing_correlation_id {
        let existing = std::iter::once(options.correlation_id_header.as_str())
            .chain(FALLBACK_CORRELATION_HEADERS)
            .find_map(|name| headers.get(name));

        if let Some(value) = existing {
            return CorrelationResolution {
                id: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                set_response_header: false,
            };
        }
    }

    if !options.enable_correlation_id {
        return CorrelationResolution {
            id: String::new(),
            set_response_header: false,
        };
    }

    CorrelationResolution {
        id: Uuid::new_v4().to_string(),
        set_response_header: true,
    }
}
