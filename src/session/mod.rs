//! Session Lifecycle
//!
//! The session controller orchestrates login, signup, logout, forced logout,
//! startup auth checks, and proactive token renewal. It owns the session
//! state container and injects its callbacks into the refresh coordinator at
//! construction time, so the coordinator can never observe an unwired
//! forced-logout handler.

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::client::ApiClient;
use crate::core::{HttpTransport, ReqwestHttpTransport};
use crate::error::{user_message, AuthError, AuthResult};
use crate::token::{InMemoryTokenStore, RefreshCoordinator, SessionHooks, TokenStore};
use crate::types::{
    AuthConfig, LoginRequest, SessionState, SignupRequest, TokenSet, TokenStatus, User,
};

/// Shared, explicitly owned session-state container.
///
/// Collaborators receive clones of this handle instead of reaching into a
/// process-wide global.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionHandle {
    /// Create a handle holding the default (unauthenticated) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.read().unwrap().clone()
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.inner.write().unwrap());
    }

    fn reset(&self) {
        *self.inner.write().unwrap() = SessionState::default();
    }
}

/// Bridges coordinator outcomes into the token store and session state.
struct ControllerHooks {
    store: Arc<dyn TokenStore>,
    session: SessionHandle,
}

impl SessionHooks for ControllerHooks {
    fn on_forced_logout(&self) {
        warn!("forced logout: clearing tokens and session state");
        self.store.clear();
        self.session.reset();
    }

    fn on_tokens_refreshed(&self, tokens: &TokenSet) {
        debug!(expires_at = ?tokens.expires_at, "session tokens renewed");
    }
}

/// Session lifecycle controller.
pub struct SessionController<T: HttpTransport> {
    config: AuthConfig,
    api: AuthApi<T>,
    store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator<T>>,
    session: SessionHandle,
}

impl SessionController<ReqwestHttpTransport> {
    /// Create a controller with the default transport and in-memory store.
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        let transport = Arc::new(ReqwestHttpTransport::with_timeout(config.timeout)?);
        Ok(Self::with_components(
            config,
            transport,
            Arc::new(InMemoryTokenStore::new()),
        ))
    }
}

impl<T: HttpTransport> SessionController<T> {
    /// Create a controller with custom transport and token store.
    pub fn with_components(
        config: AuthConfig,
        transport: Arc<T>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let session = SessionHandle::new();
        let hooks = Arc::new(ControllerHooks {
            store: store.clone(),
            session: session.clone(),
        });
        let coordinator = Arc::new(RefreshCoordinator::new(
            config.clone(),
            transport.clone(),
            store.clone(),
            hooks,
        ));
        let client = Arc::new(ApiClient::new(
            config.clone(),
            transport,
            store.clone(),
            coordinator.clone(),
        ));

        Self {
            config,
            api: AuthApi::new(client),
            store,
            coordinator,
            session,
        }
    }

    /// The session-state handle.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// A copy of the current session state.
    pub fn state(&self) -> SessionState {
        self.session.snapshot()
    }

    /// The request pipeline, for business calls beyond authentication.
    pub fn client(&self) -> &Arc<ApiClient<T>> {
        self.api.client()
    }

    /// Log in with the given credentials.
    ///
    /// On success the token set is stored, the session becomes
    /// authenticated, and the profile is fetched to populate `user` (a
    /// profile failure is logged, not surfaced; `user` stays empty until the
    /// next auth check). On failure the user-visible message lands in
    /// `SessionState.error`.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<()> {
        request.validate()?;

        self.session.update(|s| {
            s.error = None;
            s.loading = true;
        });

        match self.perform_login(request).await {
            Ok(()) => {
                info!("login succeeded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                let message = user_message(&e);
                self.session.update(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    async fn perform_login(&self, request: &LoginRequest) -> AuthResult<()> {
        let response = self.api.login(request).await?;
        let tokens = TokenSet::from_response(&response).ok_or(AuthError::Protocol {
            message: "login response is missing tokens".to_string(),
        })?;

        self.store.set(tokens);
        self.session.update(|s| {
            s.is_authenticated = true;
            s.loading = false;
        });

        // User info arrives lazily; the session is already authenticated.
        match self.api.me().await {
            Ok(user) => self.session.update(|s| s.user = Some(user)),
            Err(e) => warn!(error = %e, "profile fetch after login failed"),
        }

        Ok(())
    }

    /// Register a new account. Session state is untouched on success; the
    /// user still has to log in.
    pub async fn signup(&self, request: &SignupRequest) -> AuthResult<String> {
        request.validate()?;

        self.session.update(|s| s.error = None);

        match self.api.signup(request).await {
            Ok(message) => {
                info!("signup succeeded");
                Ok(message)
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                let message = user_message(&e);
                self.session.update(|s| s.error = Some(message));
                Err(e)
            }
        }
    }

    /// Log out. The server call is best-effort; tokens and session state are
    /// cleared regardless of its outcome.
    pub async fn logout(&self) {
        if let Some(tokens) = self.store.get() {
            if let Err(e) = self.api.logout(tokens.refresh_token()).await {
                warn!(error = %e, "server logout failed; clearing local session anyway");
            }
        }

        self.store.clear();
        self.session.reset();
        info!("logged out");
    }

    /// Synchronous, local-only session termination.
    pub fn force_logout(&self) {
        warn!("forced logout requested");
        self.store.clear();
        self.session.reset();
    }

    /// Check authentication status on startup or focus regain.
    ///
    /// When tokens are present but no user is loaded, fetches the profile.
    /// A failure clears the tokens and resets the session without recording
    /// a user-visible error: "never logged in" and "session expired" look
    /// the same afterwards.
    pub async fn check_auth_status(&self) -> AuthResult<Option<User>> {
        if self.store.get().is_none() {
            return Ok(None);
        }

        if let Some(user) = self.session.snapshot().user {
            return Ok(Some(user));
        }

        match self.api.me().await {
            Ok(user) => {
                self.session.update(|s| {
                    s.is_authenticated = true;
                    s.user = Some(user.clone());
                });
                Ok(Some(user))
            }
            Err(e) => {
                debug!(error = %e, "auth status check failed; resetting session");
                self.store.clear();
                self.session.update(|s| {
                    s.is_authenticated = false;
                    s.user = None;
                    s.loading = false;
                });
                Err(e)
            }
        }
    }

    /// Re-validate the session when the window or tab regains focus.
    pub async fn handle_focus_regained(&self) -> AuthResult<Option<User>> {
        let snapshot = self.session.snapshot();
        if !snapshot.is_authenticated {
            return Ok(None);
        }
        if snapshot.user.is_some() || self.store.get().is_none() {
            return Ok(snapshot.user);
        }
        self.check_auth_status().await
    }

    /// Trigger a refresh through the coordinator's single-flight gate.
    pub async fn refresh_now(&self) -> AuthResult<()> {
        self.coordinator.refresh_access_token().await.map(|_| ())
    }

    /// Clear the recorded user-visible error.
    pub fn clear_error(&self) {
        self.session.update(|s| s.error = None);
    }

    /// Replace the cached user profile.
    pub fn update_user(&self, user: User) {
        self.session.update(|s| s.user = Some(user));
    }

    /// Report current token health.
    pub fn token_status(&self) -> TokenStatus {
        let tokens = self.store.get();
        TokenStatus {
            is_authenticated: self.session.snapshot().is_authenticated,
            has_tokens: tokens.is_some(),
            is_expired: tokens.as_ref().map(TokenSet::is_expired).unwrap_or(false),
            expires_at: tokens.as_ref().and_then(|t| t.expires_at),
            will_expire_soon: tokens
                .as_ref()
                .map(|t| t.expires_within(self.config.refresh_threshold))
                .unwrap_or(false),
        }
    }

    /// Run one proactive-refresh check: renew the access token when its
    /// remaining lifetime is at or below the threshold but not yet zero.
    pub async fn run_proactive_refresh_check(&self) {
        let Some(tokens) = self.store.get() else {
            return;
        };
        if tokens.expires_within(self.config.refresh_threshold) {
            debug!("access token expiring soon; refreshing proactively");
            if let Err(e) = self.refresh_now().await {
                warn!(error = %e, "proactive refresh failed");
            }
        }
    }
}

impl<T: HttpTransport + 'static> SessionController<T> {
    /// Spawn the proactive-refresh scheduler: an immediate check, then one
    /// every `refresh_check_interval`.
    pub fn spawn_refresh_scheduler(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(controller.config.refresh_check_interval);
            loop {
                ticker.tick().await;
                controller.run_proactive_refresh_check().await;
            }
        })
    }
}
