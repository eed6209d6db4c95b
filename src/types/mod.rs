//! Types
//!
//! Core type definitions for the authentication client.

pub mod auth;
pub mod config;
pub mod session;
pub mod token;

pub use auth::*;
pub use config::*;
pub use session::*;
pub use token::*;
