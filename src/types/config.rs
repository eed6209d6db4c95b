//! Configuration Types
//!
//! Client configuration with per-environment profiles.

use std::str::FromStr;
use std::time::Duration;

/// Deployment environment. Controls the default request timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Per-environment request timeout.
    pub fn api_timeout(&self) -> Duration {
        match self {
            Self::Local => Duration::from_secs(30),
            Self::Development => Duration::from_secs(15),
            Self::Staging | Self::Production => Duration::from_secs(10),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Authentication client configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// API base URL, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Refresh the access token when its remaining lifetime falls at or
    /// below this threshold (default: 5 minutes).
    pub refresh_threshold: Duration,
    /// Interval between proactive expiry checks (default: 1 minute).
    pub refresh_check_interval: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AuthConfig {
    /// Configuration with the given environment's timeout profile.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: environment.api_timeout(),
            refresh_threshold: Duration::from_secs(300),
            refresh_check_interval: Duration::from_secs(60),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `APP_ENV` selects the timeout profile (`local`, `development`,
    /// `staging`, `production`; unknown values fall back to `development`)
    /// and `APP_API_BASE_URL` overrides the base URL.
    pub fn from_env() -> Self {
        let environment = std::env::var("APP_ENV")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let mut config = Self::for_environment(environment);
        if let Ok(base_url) = std::env::var("APP_API_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_timeouts() {
        assert_eq!(Environment::Local.api_timeout(), Duration::from_secs(30));
        assert_eq!(
            Environment::Development.api_timeout(),
            Duration::from_secs(15)
        );
        assert_eq!(Environment::Staging.api_timeout(), Duration::from_secs(10));
        assert_eq!(
            Environment::Production.api_timeout(),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!("local".parse(), Ok(Environment::Local));
        assert!("unknown".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.refresh_threshold, Duration::from_secs(300));
        assert_eq!(config.refresh_check_interval, Duration::from_secs(60));
    }
}
