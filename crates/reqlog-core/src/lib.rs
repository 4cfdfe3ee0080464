//! # Reqlog Core
//!
//! Core types, error definitions and the sensitive data masker shared by
//! every Reqlog crate. Nothing in here knows about HTTP; the REST layer
//! builds on these pieces.

pub mod error;
pub mod masking;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use masking::*;
pub use result::*;
