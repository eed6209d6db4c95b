//! Configuration Builder
//!
//! Fluent builder for [`AuthConfig`].

use std::time::Duration;
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::types::{AuthConfig, Environment};

/// Configuration builder.
#[derive(Default)]
pub struct AuthConfigBuilder {
    base_url: Option<String>,
    environment: Option<Environment>,
    timeout: Option<Duration>,
    refresh_threshold: Option<Duration>,
    refresh_check_interval: Option<Duration>,
}

impl AuthConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API base URL (required).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Select the environment timeout profile.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the proactive-refresh threshold.
    pub fn refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = Some(threshold);
        self
    }

    /// Override the proactive-refresh check interval.
    pub fn refresh_check_interval(mut self, interval: Duration) -> Self {
        self.refresh_check_interval = Some(interval);
        self
    }

    /// Build the configuration, validating the base URL.
    pub fn build(self) -> AuthResult<AuthConfig> {
        let base_url = self.base_url.ok_or_else(|| AuthError::Configuration {
            message: "base_url is required".to_string(),
        })?;

        let parsed = Url::parse(&base_url).map_err(|e| AuthError::Configuration {
            message: format!("invalid base_url '{}': {}", base_url, e),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AuthError::Configuration {
                message: format!("base_url must be http(s), got '{}'", parsed.scheme()),
            });
        }

        let environment = self.environment.unwrap_or_default();
        let defaults = AuthConfig::for_environment(environment);

        Ok(AuthConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            refresh_threshold: self.refresh_threshold.unwrap_or(defaults.refresh_threshold),
            refresh_check_interval: self
                .refresh_check_interval
                .unwrap_or(defaults.refresh_check_interval),
        })
    }
}

/// Create a new configuration builder.
pub fn auth_config() -> AuthConfigBuilder {
    AuthConfigBuilder::new()
}
