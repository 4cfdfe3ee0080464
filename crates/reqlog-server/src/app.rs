//! Demo application routes.

use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use reqlog_core::ReqlogError;
use reqlog_rest::{
    controllers::health_controller,
    responses::{ok, ApiResult, AppError},
    CorrelationId, LoggingState, RouterExt,
};
use serde::{Deserialize, Serialize};

/// Order submitted to `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub item: String,
    pub quantity: u32,
    /// Never echoed back; present so masking has something to hide.
    #[serde(default, skip_serializing)]
    pub payment_token: Option<String>,
}

/// Order returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: u64,
    pub item: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Builds the demo router with request/response logging applied.
pub fn build_router(state: LoggingState) -> Router {
    Router::new()
        .merge(health_controller::router())
        .route("/api/orders", post(create_order))
        .route("/api/orders/:id", get(get_order))
        .route("/api/fail", get(fail))
        .with_request_response_logging(state)
}

async fn create_order(
    correlation_id: Option<CorrelationId>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    if request.quantity == 0 {
        return Err(
            AppError::new(ReqlogError::bad_request("quantity must be at least 1"))
                .with_correlation_id(correlation_id.as_ref()),
        );
    }

    ok(OrderResponse {
        id: 1,
        item: request.item,
        quantity: request.quantity,
        correlation_id: correlation_id.map(|id| id.0),
    })
}

async fn get_order(
    correlation_id: Option<CorrelationId>,
    Path(id): Path<u64>,
) -> ApiResult<OrderResponse> {
    if id != 1 {
        return Err(AppError::new(ReqlogError::not_found("Order", id))
            .with_correlation_id(correlation_id.as_ref()));
    }

    ok(OrderResponse {
        id,
        item: "widget".to_string(),
        quantity: 3,
        correlation_id: None,
    })
}

async fn fail(correlation_id: Option<CorrelationId>) -> ApiResult<()> {
    Err(AppError::new(ReqlogError::internal("simulated downstream failure"))
        .with_correlation_id(correlation_id.as_ref()))
}
