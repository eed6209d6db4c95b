//! Diary Auth Client
//!
//! Client-side session and token management for the diary REST API.
//!
//! The crate keeps a single authenticated session alive against a backend
//! that issues short-lived access tokens and rotating refresh tokens:
//!
//! - **Request pipeline**: attaches the bearer token, recovers from a 401 by
//!   refreshing and replaying the request exactly once
//! - **Refresh coordinator**: at most one token exchange in flight; all
//!   concurrent 401s share its outcome
//! - **Session controller**: login, signup, logout, startup auth checks, and
//!   proactive renewal before expiry
//!
//! # Example
//!
//! ```rust,no_run
//! use diary_auth_client::{auth_config, Environment, LoginRequest, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = auth_config()
//!         .base_url("https://api.example.com/api")
//!         .environment(Environment::Production)
//!         .build()?;
//!
//!     let controller = SessionController::new(config)?;
//!     controller
//!         .login(&LoginRequest {
//!             username_or_email: "alice@example.com".to_string(),
//!             password: "secret1".to_string(),
//!         })
//!         .await?;
//!
//!     println!("authenticated: {}", controller.state().is_authenticated);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod session;
pub mod token;
pub mod types;

// Configuration
pub use builders::{auth_config, AuthConfigBuilder};
pub use types::config::{AuthConfig, Environment};

// Errors
pub use error::{AuthError, AuthResult, NetworkError};

// Transport
pub use crate::core::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Tokens
pub use token::{
    create_in_memory_token_store, InMemoryTokenStore, RefreshCoordinator, SessionHooks, TokenStore,
};
pub use types::token::{TokenResponse, TokenSet};

// Session
pub use api::AuthApi;
pub use client::ApiClient;
pub use session::{SessionController, SessionHandle};
pub use types::auth::{LoginRequest, SignupRequest};
pub use types::session::{SessionState, TokenStatus, User};
