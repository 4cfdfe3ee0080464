//! Errors raised by the downstream stage of an exchange.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Error attached to a response by the stage behind the logging middleware.
///
/// Handlers (through [`AppError`](crate::responses::AppError), for 5xx results) insert it into
/// the response extensions; the middleware also creates one when the response
/// body stream fails. Its presence switches the log record to error severity.
/// The extension stays on the response, so outer layers still see it.
#[derive(Clone)]
pub struct ExchangeError(Arc<dyn Error + Send + Sync>);

impl ExchangeError {
    /// Wraps any error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Wraps an already boxed error.
    #[must_use]
    pub fn from_boxed(error: Box<dyn Error + Send + Sync>) -> Self {
        Self(Arc::from(error))
    }

    /// Creates an error carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::from_boxed(message.into())
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Debug for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}
