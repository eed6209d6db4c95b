//! Auth API
//!
//! Typed wrappers for the authentication endpoints. The refresh endpoint has
//! no wrapper here on purpose: only the refresh coordinator may call it.

use std::sync::Arc;

use tracing::debug;

use crate::client::ApiClient;
use crate::core::{HttpResponse, HttpTransport};
use crate::error::{create_error_from_response, parse_error_message, AuthError, AuthResult};
use crate::types::{ApiEnvelope, LoginRequest, RefreshRequest, SignupRequest, TokenResponse, User};

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const ME_PATH: &str = "/auth/me";

/// Authentication endpoint wrappers.
pub struct AuthApi<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
}

impl<T: HttpTransport> AuthApi<T> {
    /// Create new API wrapper.
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self { client }
    }

    /// The underlying request pipeline, for business calls beyond auth.
    pub fn client(&self) -> &Arc<ApiClient<T>> {
        &self.client
    }

    /// Exchange credentials for a token set.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<TokenResponse> {
        let response = self.client.post(LOGIN_PATH, request).await?;
        if !response.is_success() {
            return Err(AuthError::Authentication {
                message: rejection_message(&response, "Login failed"),
            });
        }

        let envelope: ApiEnvelope<TokenResponse> = parse_envelope(&response)?;
        envelope.into_data()
    }

    /// Register a new account. Returns the server's status message.
    pub async fn signup(&self, request: &SignupRequest) -> AuthResult<String> {
        let response = self.client.post(SIGNUP_PATH, request).await?;
        if !response.is_success() {
            return Err(AuthError::Authentication {
                message: rejection_message(&response, "Signup failed"),
            });
        }

        let envelope: ApiEnvelope<serde_json::Value> = parse_envelope(&response)?;
        Ok(envelope.message)
    }

    /// Invalidate the refresh token server-side.
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let payload = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self.client.post(LOGOUT_PATH, &payload).await?;
        if !response.is_success() {
            return Err(create_error_from_response(response.status, &response.body));
        }
        debug!("server-side logout acknowledged");
        Ok(())
    }

    /// Fetch the current user's profile.
    pub async fn me(&self) -> AuthResult<User> {
        let response = self.client.get(ME_PATH).await?;
        if !response.is_success() {
            return Err(create_error_from_response(response.status, &response.body));
        }

        let envelope: ApiEnvelope<User> = parse_envelope(&response)?;
        envelope.into_data()
    }
}

fn parse_envelope<D: serde::de::DeserializeOwned>(
    response: &HttpResponse,
) -> AuthResult<ApiEnvelope<D>> {
    serde_json::from_str(&response.body).map_err(|e| AuthError::Protocol {
        message: format!("invalid response envelope: {}", e),
    })
}

fn rejection_message(response: &HttpResponse, fallback: &str) -> String {
    parse_error_message(&response.body).unwrap_or_else(|| fallback.to_string())
}
