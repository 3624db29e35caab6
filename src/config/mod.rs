//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions, loading and validation
//! - [`defaults`]: serde default value functions

mod defaults;
mod types;

pub use types::{ApiConfig, Config, LoggingConfig};
