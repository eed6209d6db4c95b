//! Refresh Coordinator
//!
//! Single-flight refresh-token exchange with a waiter queue.
//!
//! The coordinator is a two-state machine: `Idle` and `Refreshing`. The first
//! caller after `Idle` becomes the leader, flips the gate, and performs the
//! exchange; every caller that arrives while the gate is `Refreshing` parks on
//! a oneshot channel and resumes when the exchange settles. The gate is a
//! `std::sync::Mutex` that is never held across an await, so the
//! check-and-set stays atomic on a multithreaded runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::api::REFRESH_PATH;
use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{parse_error_message, AuthError, AuthResult};
use crate::token::TokenStore;
use crate::types::{ApiEnvelope, AuthConfig, RefreshRequest, TokenResponse, TokenSet};

/// Session-level callbacks injected at construction time.
///
/// The coordinator never touches session state directly; it reports
/// irrecoverable failure (forced logout) and successful renewal through
/// these hooks.
pub trait SessionHooks: Send + Sync {
    /// Invoked when authentication is irrecoverable: missing refresh token
    /// or a failed refresh exchange.
    fn on_forced_logout(&self);

    /// Invoked after a successful refresh, once the new token set is stored.
    fn on_tokens_refreshed(&self, tokens: &TokenSet) {
        let _ = tokens;
    }
}

enum GateState {
    Idle,
    Refreshing(Vec<oneshot::Sender<AuthResult<String>>>),
}

enum Role {
    Leader { refresh_token: String },
    Follower(oneshot::Receiver<AuthResult<String>>),
    MissingToken,
}

/// Coordinates refresh-token exchanges so at most one is in flight.
pub struct RefreshCoordinator<T: HttpTransport> {
    config: AuthConfig,
    transport: Arc<T>,
    store: Arc<dyn TokenStore>,
    hooks: Arc<dyn SessionHooks>,
    gate: Mutex<GateState>,
}

impl<T: HttpTransport> RefreshCoordinator<T> {
    /// Create new coordinator.
    pub fn new(
        config: AuthConfig,
        transport: Arc<T>,
        store: Arc<dyn TokenStore>,
        hooks: Arc<dyn SessionHooks>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            hooks,
            gate: Mutex::new(GateState::Idle),
        }
    }

    /// Obtain a fresh access token, performing at most one refresh exchange
    /// across all concurrent callers.
    ///
    /// The leader performs the exchange and writes the new token set to the
    /// store before anyone resumes; followers receive the same outcome in
    /// arrival order. When the store holds no refresh token, or the exchange
    /// fails, the forced-logout hook fires and every caller gets the error.
    pub async fn refresh_access_token(&self) -> AuthResult<String> {
        let role = {
            let mut gate = self.gate.lock().unwrap();
            match &mut *gate {
                GateState::Refreshing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Follower(rx)
                }
                GateState::Idle => match self.store.get() {
                    Some(tokens) => {
                        *gate = GateState::Refreshing(Vec::new());
                        Role::Leader {
                            refresh_token: tokens.refresh_token().to_string(),
                        }
                    }
                    // The gate stays Idle: there is nothing to exchange.
                    None => Role::MissingToken,
                },
            }
        };

        match role {
            Role::MissingToken => {
                warn!("refresh requested without a refresh token; forcing logout");
                self.hooks.on_forced_logout();
                Err(AuthError::NoRefreshToken)
            }
            Role::Follower(rx) => {
                debug!("refresh already in flight; waiting for its outcome");
                rx.await.unwrap_or_else(|_| {
                    Err(AuthError::RefreshFailed {
                        message: "refresh was abandoned".to_string(),
                    })
                })
            }
            Role::Leader { refresh_token } => {
                debug!("starting refresh token exchange");
                let result = match self.exchange(&refresh_token).await {
                    Ok(tokens) => {
                        let access_token = tokens.access_token().to_string();
                        self.store.set(tokens.clone());
                        self.hooks.on_tokens_refreshed(&tokens);
                        info!("access token refreshed");
                        Ok(access_token)
                    }
                    Err(e) => {
                        error!(error = %e, "refresh token exchange failed; forcing logout");
                        self.hooks.on_forced_logout();
                        Err(e)
                    }
                };

                let waiters = {
                    let mut gate = self.gate.lock().unwrap();
                    match std::mem::replace(&mut *gate, GateState::Idle) {
                        GateState::Refreshing(waiters) => waiters,
                        GateState::Idle => Vec::new(),
                    }
                };

                debug!(waiters = waiters.len(), "refresh settled; resuming waiters");
                for waiter in waiters {
                    let _ = waiter.send(result.clone());
                }

                result
            }
        }
    }

    /// Perform the refresh-token exchange directly on the transport. The
    /// exchange never goes through the request pipeline, so its own 401 can
    /// never re-enter the refresh logic.
    async fn exchange(&self, refresh_token: &str) -> AuthResult<TokenSet> {
        let payload = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let body = serde_json::to_string(&payload).map_err(|e| AuthError::Protocol {
            message: format!("failed to encode refresh request: {}", e),
        })?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{}", self.config.base_url, REFRESH_PATH),
            headers,
            body: Some(body),
            timeout: Some(self.config.timeout),
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let message = parse_error_message(&response.body)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(AuthError::RefreshFailed { message });
        }

        let envelope: ApiEnvelope<TokenResponse> = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::Protocol {
                message: format!("invalid refresh response: {}", e),
            })?;
        let mut token_response = envelope.into_data()?;

        // Keep the previous refresh token when the server does not rotate it.
        if token_response.refresh_token.is_none() {
            token_response.refresh_token = Some(refresh_token.to_string());
        }

        TokenSet::from_response(&token_response).ok_or(AuthError::Protocol {
            message: "refresh response is missing tokens".to_string(),
        })
    }
}
