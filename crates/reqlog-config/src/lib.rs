//! # Reqlog Config
//!
//! Configuration management for Reqlog.
//! Options are layered from defaults, TOML files, environment variables
//! and finally code overrides, then validated once before use.

mod app_config;
mod loader;
mod options;
pub mod validation;

pub use app_config::*;
pub use loader::*;
pub use options::*;
pub use validation::{ConfigValidationError, ConfigValidator};
