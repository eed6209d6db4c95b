//! Core Components
//!
//! Core infrastructure for the authentication client.

pub mod transport;

pub use transport::*;
