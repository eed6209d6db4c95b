//! Token Store
//!
//! Atomic storage for the client's single token set.
//!
//! The store holds the access token, refresh token, and absolute expiry as
//! one unit: `set` replaces the whole triple and `clear` removes it, so a
//! reader can never observe an access token without its refresh token. The
//! trait is synchronous and infallible; a durable backend (an encrypted file,
//! a platform keychain) can be plugged in behind the same contract.

use std::sync::Mutex;

use crate::types::TokenSet;

/// Token store interface.
pub trait TokenStore: Send + Sync {
    /// Get the current token set, if any. Never blocks, never fails.
    fn get(&self) -> Option<TokenSet>;

    /// Replace the stored token set atomically.
    fn set(&self, tokens: TokenSet);

    /// Remove the stored token set.
    fn clear(&self);
}

/// In-memory token store implementation.
#[derive(Default)]
pub struct InMemoryTokenStore {
    slot: Mutex<Option<TokenSet>>,
}

impl InMemoryTokenStore {
    /// Create new in-memory token store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<TokenSet> {
        self.slot.lock().unwrap().clone()
    }

    fn set(&self, tokens: TokenSet) {
        *self.slot.lock().unwrap() = Some(tokens);
    }

    fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

/// Mock token store for testing.
#[derive(Default)]
pub struct MockTokenStore {
    slot: Mutex<Option<TokenSet>>,
    set_history: Mutex<Vec<TokenSet>>,
    clear_count: Mutex<u32>,
}

impl MockTokenStore {
    /// Create new mock token store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store.
    pub fn with_tokens(tokens: TokenSet) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap() = Some(tokens);
        store
    }

    /// Get set history.
    pub fn get_set_history(&self) -> Vec<TokenSet> {
        self.set_history.lock().unwrap().clone()
    }

    /// Number of times `clear` was called.
    pub fn clear_count(&self) -> u32 {
        *self.clear_count.lock().unwrap()
    }
}

impl TokenStore for MockTokenStore {
    fn get(&self) -> Option<TokenSet> {
        self.slot.lock().unwrap().clone()
    }

    fn set(&self, tokens: TokenSet) {
        self.set_history.lock().unwrap().push(tokens.clone());
        *self.slot.lock().unwrap() = Some(tokens);
    }

    fn clear(&self) {
        *self.clear_count.lock().unwrap() += 1;
        *self.slot.lock().unwrap() = None;
    }
}

/// Create in-memory token store.
pub fn create_in_memory_token_store() -> InMemoryTokenStore {
    InMemoryTokenStore::new()
}

/// Create mock token store for testing.
pub fn create_mock_token_store() -> MockTokenStore {
    MockTokenStore::new()
}
