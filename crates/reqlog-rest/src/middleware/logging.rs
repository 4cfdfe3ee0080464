//! Request/response logging middleware.

use super::capture::{capture_request, capture_response, CapturingSink};
use super::correlation;
use crate::{CorrelationId, ExchangeError, LogRecord, LoggingState, Severity};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::warn;

/// Logs one record per exchange.
///
/// Requests under an ignored path prefix go straight to `next`. Every other
/// exchange gets a correlation id, has its request rendered before `next`
/// runs and its response body buffered while `next` produces it. The record
/// is emitted at error severity when the response carries an
/// [`ExchangeError`] or its body stream failed. The buffered body is handed
/// back unchanged after the record is written.
pub async fn request_response_logging(
    State(state): State<LoggingState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let options = state.options();

    if options.is_ignored(request.uri().path()) {
        return next.run(request).await;
    }

    let started_at = Utc::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let correlation = correlation::resolve(request.headers(), options);
    if correlation.is_tracked() {
        request
            .extensions_mut()
            .insert(CorrelationId(correlation.id.clone()));
    }

    let (request_text, request) = capture_request(request, options, state.masker()).await;

    let start = Instant::now();
    let (mut parts, body) = next.run(request).await.into_parts();
    let captured = CapturingSink::drain(body).await;
    let elapsed = start.elapsed();

    if correlation.set_response_header {
        if let Ok(value) = HeaderValue::from_str(&correlation.id) {
            parts
                .headers
                .entry(state.correlation_header().clone())
                .or_insert(value);
        }
    }

    let response_text = capture_response(&captured, options, state.masker());

    let error = parts
        .extensions
        .get::<ExchangeError>()
        .cloned()
        .or_else(|| captured.error().cloned());

    let record = LogRecord {
        severity: if error.is_some() { Severity::Error } else { Severity::Info },
        method,
        path,
        status: parts.status.as_u16(),
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        correlation_id: correlation.id,
        request: request_text,
        response: response_text,
        error,
        started_at,
    };

    if catch_unwind(AssertUnwindSafe(|| state.sink().log(&record))).is_err() {
        warn!(path = %record.path, "Log sink panicked, record dropped");
    }

    Response::from_parts(parts, captured.into_body())
}
