//! Token Types
//!
//! Token set and wire-format definitions.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Token response returned by the login and refresh endpoints
/// (the backend's `JwtAuthenticationResponse`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token. The refresh endpoint may omit it when the
    /// refresh token is not rotated.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Client-side token set.
///
/// Both tokens are required fields, so a set never holds an access token
/// without its refresh token or vice versa. The relative `expiresIn` from the
/// wire is converted to an absolute timestamp at construction time.
#[derive(Clone)]
pub struct TokenSet {
    access_token: SecretString,
    refresh_token: SecretString,
    /// Absolute access-token expiry; `None` means the server sent no lifetime.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Create a new token set.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            refresh_token: SecretString::new(refresh_token.into()),
            expires_at,
        }
    }

    /// Build from a token response. Returns `None` when the response carries
    /// no refresh token, since a set without one cannot be stored.
    pub fn from_response(response: &TokenResponse) -> Option<Self> {
        let refresh_token = response.refresh_token.clone()?;
        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs as i64));
        Some(Self::new(
            response.access_token.clone(),
            refresh_token,
            expires_at,
        ))
    }

    /// Get the access token value.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Get the refresh token value.
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    /// Format the access token as an `Authorization` header value.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    /// Check if the access token is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }

    /// Check if the access token expires within the given threshold
    /// and has not expired yet. This is the proactive-refresh window.
    pub fn expires_within(&self, threshold: std::time::Duration) -> bool {
        match self.remaining_lifetime() {
            Some(remaining) => {
                remaining > Duration::zero()
                    && remaining <= Duration::from_std(threshold).unwrap_or(Duration::zero())
            }
            None => false,
        }
    }

    /// Remaining access-token lifetime, if an expiry is known.
    /// Negative when already expired.
    pub fn remaining_lifetime(&self) -> Option<Duration> {
        self.expires_at.map(|exp| exp - Utc::now())
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "tokenType": "Bearer",
            "expiresIn": 3600
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "access-1");
        assert_eq!(response.refresh_token, Some("refresh-1".to_string()));
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(3600));
    }

    #[test]
    fn test_token_response_defaults() {
        let json = r#"{"accessToken": "access-1"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.refresh_token, None);
        assert_eq!(response.expires_in, None);
    }

    #[test]
    fn test_from_response_converts_lifetime_to_absolute_expiry() {
        let response = TokenResponse {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            token_type: "Bearer".to_string(),
            expires_in: Some(3600),
        };

        let tokens = TokenSet::from_response(&response).unwrap();
        let remaining = tokens.remaining_lifetime().unwrap();
        assert!(remaining > Duration::seconds(3590));
        assert!(remaining <= Duration::seconds(3600));
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_from_response_requires_refresh_token() {
        let response = TokenResponse {
            access_token: "access-1".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_in: Some(3600),
        };

        assert!(TokenSet::from_response(&response).is_none());
    }

    #[test]
    fn test_expires_within_window() {
        let threshold = std::time::Duration::from_secs(300);

        // Expires in 2 minutes: inside the window.
        let tokens = TokenSet::new("a", "r", Some(Utc::now() + Duration::seconds(120)));
        assert!(tokens.expires_within(threshold));

        // Expires in an hour: outside the window.
        let tokens = TokenSet::new("a", "r", Some(Utc::now() + Duration::seconds(3600)));
        assert!(!tokens.expires_within(threshold));

        // Already expired: not in the window (nothing left to renew proactively).
        let tokens = TokenSet::new("a", "r", Some(Utc::now() - Duration::seconds(10)));
        assert!(!tokens.expires_within(threshold));
        assert!(tokens.is_expired());

        // No expiry known: never in the window.
        let tokens = TokenSet::new("a", "r", None);
        assert!(!tokens.expires_within(threshold));
    }

    #[test]
    fn test_bearer_header() {
        let tokens = TokenSet::new("access-1", "refresh-1", None);
        assert_eq!(tokens.bearer_header(), "Bearer access-1");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = TokenSet::new("secret-access", "secret-refresh", None);
        let formatted = format!("{:?}", tokens);
        assert!(!formatted.contains("secret-access"));
        assert!(!formatted.contains("secret-refresh"));
        assert!(formatted.contains("[REDACTED]"));
    }
}
