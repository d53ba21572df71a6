//! Infrastructure layer module
//!
//! - Settings management (figment)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod logging;
