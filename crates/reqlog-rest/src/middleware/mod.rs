//! Request/response logging middleware and its building blocks.

pub mod capture;
pub mod correlation;
mod logging;

pub use capture::{capture_request, capture_response, CapturingSink, RESPONSE_BODY_DISABLED};
pub use correlation::{resolve as resolve_correlation_id, CorrelationResolution};
pub use logging::request_response_logging;
