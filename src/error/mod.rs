//! Error Types
//!
//! Error hierarchy for the authentication client.
//!
//! Errors are `Clone` because a single refresh outcome is fanned out to every
//! request waiting on the in-flight refresh.

use std::time::Duration;
use thiserror::Error;

/// Root error type for authentication operations.
#[derive(Error, Clone, Debug)]
pub enum AuthError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("no refresh token available")]
    NoRefreshToken,

    #[error("token refresh failed: {message}")]
    RefreshFailed { message: String },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("invalid response: {message}")]
    Protocol { message: String },

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
}

impl AuthError {
    /// Get error code for log correlation.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "AUTH_VALIDATION",
            Self::Configuration { .. } => "AUTH_CONFIG",
            Self::Authentication { .. } => "AUTH_REJECTED",
            Self::Unauthorized { .. } => "AUTH_UNAUTHORIZED",
            Self::NoRefreshToken => "AUTH_NO_REFRESH_TOKEN",
            Self::RefreshFailed { .. } => "AUTH_REFRESH_FAILED",
            Self::Network(_) => "AUTH_NETWORK",
            Self::Protocol { .. } => "AUTH_PROTOCOL",
            Self::Server { .. } => "AUTH_SERVER",
        }
    }

    /// Check if error requires the user to sign in again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::NoRefreshToken | Self::RefreshFailed { .. }
        )
    }
}

/// Network/transport error.
#[derive(Error, Clone, Debug)]
pub enum NetworkError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("request timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Backend error envelope. Every endpoint wraps its payload in
/// `{statusCode, message, data}`; on failure `message` carries the reason.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract the backend's failure message from a response body, if present.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
}

/// Create error from a non-success HTTP response.
pub fn create_error_from_response(status: u16, body: &str) -> AuthError {
    let message = parse_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        401 => AuthError::Unauthorized { message },
        _ => AuthError::Server { status, message },
    }
}

/// Get user-friendly error message for display in session state.
pub fn user_message(error: &AuthError) -> String {
    match error {
        AuthError::Validation { message } => message.clone(),
        AuthError::Authentication { message } => message.clone(),
        AuthError::Unauthorized { .. } | AuthError::NoRefreshToken => {
            "Your session has expired. Please sign in again.".to_string()
        }
        AuthError::RefreshFailed { .. } => {
            "Failed to renew your session. Please sign in again.".to_string()
        }
        AuthError::Network(NetworkError::Timeout { .. }) => {
            "The request timed out. Please check your connection and try again.".to_string()
        }
        AuthError::Network(NetworkError::ConnectionFailed { .. }) => {
            "Could not reach the server. Please check your connection.".to_string()
        }
        AuthError::Server { .. } => {
            "The service is temporarily unavailable. Please try again later.".to_string()
        }
        _ => "An authentication error occurred. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"statusCode":401,"message":"Invalid credentials"}"#;
        assert_eq!(
            parse_error_message(body),
            Some("Invalid credentials".to_string())
        );

        assert_eq!(parse_error_message("not json"), None);
        assert_eq!(parse_error_message(r#"{"message":""}"#), None);
    }

    #[test]
    fn test_create_error_from_response() {
        let error = create_error_from_response(401, r#"{"message":"expired"}"#);
        assert!(matches!(error, AuthError::Unauthorized { .. }));

        let error = create_error_from_response(500, "");
        match error {
            AuthError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_needs_reauth() {
        assert!(AuthError::NoRefreshToken.needs_reauth());
        assert!(AuthError::RefreshFailed {
            message: "x".to_string()
        }
        .needs_reauth());
        assert!(!AuthError::Network(NetworkError::ConnectionFailed {
            message: "x".to_string()
        })
        .needs_reauth());
    }

    #[test]
    fn test_user_message_passes_through_auth_failure() {
        let error = AuthError::Authentication {
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(user_message(&error), "Invalid credentials");

        let error = AuthError::RefreshFailed {
            message: "invalid refresh token".to_string(),
        };
        assert!(user_message(&error).contains("sign in again"));
    }
}
