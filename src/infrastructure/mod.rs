//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing-subscriber)

pub mod config;
pub mod logging;
