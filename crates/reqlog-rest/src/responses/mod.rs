//! API response types.

use crate::{CorrelationId, ExchangeError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqlog_core::{ErrorResponse, ReqlogError};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Application error type for Axum.
///
/// Server errors (5xx) also carry the error as an [`ExchangeError`] response
/// extension, so the logging middleware records them at error severity.
/// Client errors are answered normally and logged as ordinary exchanges.
#[derive(Debug)]
pub struct AppError {
    error: ReqlogError,
    correlation_id: Option<String>,
}

impl AppError {
    /// Wraps an error.
    #[must_use]
    pub fn new(error: ReqlogError) -> Self {
        Self {
            error,
            correlation_id: None,
        }
    }

    /// Echoes the exchange's correlation id in the error body.
    ///
    /// Takes the `Option<CorrelationId>` extractor as is; `None` leaves the
    /// body without an id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<&CorrelationId>) -> Self {
        self.correlation_id = correlation_id.map(|id| id.0.clone());
        self
    }

    /// Returns the wrapped error.
    pub fn error(&self) -> &ReqlogError {
        &self.error
    }
}

impl From<ReqlogError> for AppError {
    fn from(err: ReqlogError) -> Self {
        Self::new(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut error_response = ErrorResponse::from_error(&self.error);
        if let Some(id) = self.correlation_id {
            error_response = error_response.with_correlation_id(id);
        }
        let body = Json(ApiResponse::<()>::error(error_response));

        let mut response = (status, body).into_response();
        if status.is_server_error() {
            response.extensions_mut().insert(ExchangeError::new(self.error));
        }
        response
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Turns a handler panic into a 500 response carrying an [`ExchangeError`].
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let error_response = ErrorResponse {
        code: "INTERNAL_ERROR".to_string(),
        message: "Internal server error".to_string(),
        correlation_id: None,
    };
    let body = Json(ApiResponse::<()>::error(error_response));

    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    response
        .extensions_mut()
        .insert(ExchangeError::msg(format!("handler panicked: {}", detail)));
    response
}
