//! Custom Axum extractors.

mod correlation_id;

pub use correlation_id::*;
