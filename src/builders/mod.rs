//! Builders
//!
//! Fluent builders for configuration.

pub mod config;

pub use config::{auth_config, AuthConfigBuilder};
