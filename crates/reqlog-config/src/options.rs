//! Request/response logging options.

use serde::{Deserialize, Serialize};

/// Header used for correlation ids when nothing else is configured.
pub const DEFAULT_CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Options read by the request/response logging middleware.
///
/// Built once at startup and shared read-only by every exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Render request headers.
    pub log_headers: bool,
    /// Render the request query string.
    pub log_query_string: bool,
    /// Render the request body.
    pub log_request_body: bool,
    /// Render the response body.
    pub log_response_body: bool,
    /// Redact `sensitive_fields` in JSON bodies.
    pub mask_sensitive_data: bool,
    /// JSON member names to redact, matched case-insensitively.
    pub sensitive_fields: Vec<String>,

    /// Generate a correlation id when the request carries none.
    pub enable_correlation_id: bool,
    /// Reuse a correlation id found on the request.
    pub use_existing_correlation_id: bool,
    /// Header carrying the correlation id.
    pub correlation_id_header: String,

    /// Path prefixes that bypass the middleware entirely, e.g. `/health`.
    pub ignored_paths: Vec<String>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            log_headers: true,
            log_query_string: true,
            log_request_body: true,
            log_response_body: true,
            mask_sensitive_data: false,
            sensitive_fields: ["password", "token", "authorization", "apiKey"]
                .into_iter()
                .map(String::from)
                .collect(),
            enable_correlation_id: true,
            use_existing_correlation_id: true,
            correlation_id_header: DEFAULT_CORRELATION_ID_HEADER.to_string(),
            ignored_paths: Vec::new(),
        }
    }
}

impl LoggingOptions {
    /// Returns true when `path` starts with an ignored prefix (ASCII case-insensitive).
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_paths.iter().any(|prefix| {
            path.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoggingOptions::default();
        assert!(options.log_headers);
        assert!(options.log_query_string);
        assert!(options.log_request_body);
        assert!(options.log_response_body);
        assert!(!options.mask_sensitive_data);
        assert_eq!(options.sensitive_fields.len(), 4);
        assert!(options.sensitive_fields.contains(&"apiKey".to_string()));
        assert!(options.enable_correlation_id);
        assert!(options.use_existing_correlation_id);
        assert_eq!(options.correlation_id_header, "X-Correlation-ID");
        assert!(options.ignored_paths.is_empty());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let options: LoggingOptions =
            serde_json::from_str(r#"{"mask_sensitive_data":true,"ignored_paths":["/metrics"]}"#)
                .unwrap();
        assert!(options.mask_sensitive_data);
        assert_eq!(options.ignored_paths, vec!["/metrics".to_string()]);
        assert!(options.log_headers);
        assert_eq!(options.correlation_id_header, DEFAULT_CORRELATION_ID_HEADER);
    }

    #[test]
    fn test_is_ignored_prefix_match() {
        let options = LoggingOptions {
            ignored_paths: vec!["/health".to_string(), "/Swagger".to_string()],
            ..LoggingOptions::default()
        };

        assert!(options.is_ignored("/health"));
        assert!(options.is_ignored("/healthz"));
        assert!(options.is_ignored("/HEALTH/live"));
        assert!(options.is_ignored("/swagger-ui/index.html"));
        assert!(!options.is_ignored("/api/health"));
        assert!(!options.is_ignored("/heal"));
        assert!(!options.is_ignored("/"));
    }

    #[test]
    fn test_is_ignored_non_ascii_path() {
        let options = LoggingOptions {
            ignored_paths: vec!["/a".to_string()],
            ..LoggingOptions::default()
        };
        // prefix length falls inside a multi-byte character
        assert!(!options.is_ignored("/é"));
    }

    #[test]
    fn test_nothing_ignored_by_default() {
        assert!(!LoggingOptions::default().is_ignored("/health"));
    }
}
