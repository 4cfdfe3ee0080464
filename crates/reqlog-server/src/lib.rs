//! # Reqlog Server Library
//!
//! Router assembly and startup helpers for the demo server.

pub mod app;
pub mod startup;
