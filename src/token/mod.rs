//! Token Management
//!
//! Token persistence and single-flight refresh coordination.
//!
//! This module provides:
//!
//! - **Token Store**: atomic storage for the client's token set
//! - **Refresh Coordinator**: at-most-one refresh exchange in flight, with a
//!   waiter queue for requests that hit a 401 while a refresh is pending

pub mod refresh;
pub mod storage;

pub use refresh::{RefreshCoordinator, SessionHooks};
pub use storage::{
    create_in_memory_token_store, create_mock_token_store, InMemoryTokenStore, MockTokenStore,
    TokenStore,
};
