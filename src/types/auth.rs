//! Auth Request/Response Types
//!
//! Request payloads and the backend response envelope.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Response envelope used by every backend endpoint:
/// `{statusCode, message, data}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, treating a missing `data` field as a protocol error.
    pub fn into_data(self) -> AuthResult<T> {
        self.data.ok_or(AuthError::Protocol {
            message: "response envelope is missing the data field".to_string(),
        })
    }
}

/// Login request payload.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

impl LoginRequest {
    /// Client-side validation, run before any network call.
    pub fn validate(&self) -> AuthResult<()> {
        if self.username_or_email.trim().is_empty() {
            return Err(validation("Please enter your username or email."));
        }
        if self.password.is_empty() {
            return Err(validation("Please enter your password."));
        }
        Ok(())
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username_or_email", &self.username_or_email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Signup request payload.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Client-side validation matching the registration form rules:
    /// username at least 2 characters, well-formed email, password at
    /// least 6 characters.
    pub fn validate(&self) -> AuthResult<()> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(validation("Please enter a username."));
        }
        if username.chars().count() < 2 {
            return Err(validation("Username must be at least 2 characters."));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(validation("Please enter an email address."));
        }
        if !is_well_formed_email(email) {
            return Err(validation("Please enter a valid email address."));
        }

        if self.password.is_empty() {
            return Err(validation("Please enter a password."));
        }
        if self.password.chars().count() < 6 {
            return Err(validation("Password must be at least 6 characters."));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Refresh/logout request payload.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

fn validation(message: &str) -> AuthError {
    AuthError::Validation {
        message: message.to_string(),
    }
}

// local-part @ domain . tld, no whitespace; same shape the signup form checks
fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serializes_camel_case() {
        let request = LoginRequest {
            username_or_email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["usernameOrEmail"], "a@b.com");
        assert_eq!(json["password"], "secret1");
    }

    #[test]
    fn test_login_validation() {
        let request = LoginRequest {
            username_or_email: "  ".to_string(),
            password: "secret1".to_string(),
        };
        assert!(matches!(
            request.validate(),
            Err(AuthError::Validation { .. })
        ));

        let request = LoginRequest {
            username_or_email: "a@b.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            username_or_email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_validation() {
        let valid = SignupRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let mut request = valid.clone();
        request.username = "a".to_string();
        assert!(request.validate().is_err());

        let mut request = valid.clone();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());

        let mut request = valid.clone();
        request.email = "a@b".to_string();
        assert!(request.validate().is_err());

        let mut request = valid;
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_envelope_parsing() {
        let json = r#"{
            "statusCode": 200,
            "message": "success",
            "data": {"accessToken": "a", "refreshToken": "r", "expiresIn": 900}
        }"#;

        let envelope: ApiEnvelope<crate::types::TokenResponse> =
            serde_json::from_str(json).unwrap();
        assert_eq!(envelope.status_code, 200);
        let tokens = envelope.into_data().unwrap();
        assert_eq!(tokens.access_token, "a");
    }

    #[test]
    fn test_envelope_missing_data_is_protocol_error() {
        let json = r#"{"statusCode": 200, "message": "ok"}"#;
        let envelope: ApiEnvelope<crate::types::User> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(AuthError::Protocol { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = LoginRequest {
            username_or_email: "a@b.com".to_string(),
            password: "secret1".to_string(),
        };
        let formatted = format!("{:?}", request);
        assert!(!formatted.contains("secret1"));
    }
}
