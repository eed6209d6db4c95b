//! Session Types
//!
//! Application-visible session state.

use serde::Deserialize;

/// Authenticated user profile, returned by the `/auth/me` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Session state owned by the session controller.
///
/// `is_authenticated` is true only while a token set is believed valid.
/// `user` is populated lazily by the profile call and may lag
/// `is_authenticated`. `error` carries the user-visible message for the
/// most recent failed attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Token status report for callers that want to inspect session health.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenStatus {
    pub is_authenticated: bool,
    pub has_tokens: bool,
    pub is_expired: bool,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub will_expire_soon: bool,
}
