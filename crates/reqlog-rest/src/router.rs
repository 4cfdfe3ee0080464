//! Attaching the logging middleware to a router.

use crate::{middleware::request_response_logging, responses::panic_response, LoggingState};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;

/// Extension methods for [`Router`].
pub trait RouterExt {
    /// Wraps every route in the request/response logging middleware.
    ///
    /// Handler panics are turned into 500 responses inside the middleware,
    /// so they are logged at error severity like any other failure. This needs
    /// panics to unwind; under `panic = "abort"` the process exits instead.
    #[must_use]
    fn with_request_response_logging(self, state: LoggingState) -> Self;
}

impl<S> RouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_request_response_logging(self, state: LoggingState) -> Self {
        self.layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(state, request_response_logging))
    }
}
