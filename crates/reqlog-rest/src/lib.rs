//! # Reqlog REST
//!
//! Axum middleware that logs every request/response exchange as one
//! structured record, threads a correlation id through the exchange and
//! masks sensitive JSON fields before anything reaches the log.
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use reqlog_config::LoggingOptions;
//! use reqlog_rest::{LoggingState, RouterExt};
//!
//! # fn build() -> reqlog_core::ReqlogResult<Router> {
//! let options = LoggingOptions {
//!     mask_sensitive_data: true,
//!     ignored_paths: vec!["/health".to_string()],
//!     ..LoggingOptions::default()
//! };
//!
//! let router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .with_request_response_logging(LoggingState::new(options)?);
//! # Ok(router)
//! # }
//! ```

pub mod controllers;
pub mod exchange;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod sink;
pub mod state;

pub use exchange::*;
pub use extractors::CorrelationId;
pub use router::*;
pub use sink::*;
pub use state::*;
