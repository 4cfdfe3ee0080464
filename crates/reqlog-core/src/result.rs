//! Result type aliases for Reqlog.

use crate::ReqlogError;

/// A specialized `Result` type for Reqlog operations.
pub type ReqlogResult<T> = Result<T, ReqlogError>;
