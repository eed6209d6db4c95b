//! API Client
//!
//! The HTTP request pipeline. Attaches the current bearer token to outgoing
//! requests and recovers transparently from authorization expiry: a 401 on a
//! business call is handed to the refresh coordinator, and the request is
//! replayed exactly once with the refreshed access token. A request to the
//! refresh endpoint itself is never retried, and a 401 on the replay passes
//! through to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::api::REFRESH_PATH;
use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{AuthError, AuthResult};
use crate::token::{RefreshCoordinator, TokenStore};
use crate::types::AuthConfig;

/// HTTP request pipeline over a transport.
pub struct ApiClient<T: HttpTransport> {
    config: AuthConfig,
    transport: Arc<T>,
    store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator<T>>,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create new client.
    pub fn new(
        config: AuthConfig,
        transport: Arc<T>,
        store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator<T>>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            coordinator,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> AuthResult<HttpResponse> {
        self.execute(HttpMethod::Get, path, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AuthResult<HttpResponse> {
        let body = serde_json::to_string(body).map_err(|e| AuthError::Protocol {
            message: format!("failed to encode request body: {}", e),
        })?;
        self.execute(HttpMethod::Post, path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> AuthResult<HttpResponse> {
        self.execute(HttpMethod::Post, path, None).await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> AuthResult<HttpResponse> {
        let bearer = self.store.get().map(|tokens| tokens.bearer_header());
        let request = self.build_request(method, path, body.clone(), bearer);
        let response = self.transport.send(request).await?;

        // The refresh endpoint is excluded so its own 401 cannot start
        // another refresh cycle.
        if response.status != 401 || path == REFRESH_PATH {
            return Ok(response);
        }

        debug!(path, "request was rejected with 401; refreshing access token");
        let access_token = self.coordinator.refresh_access_token().await?;

        // Replay once with the new token. Whatever comes back, including a
        // second 401, is the caller's result.
        let replay = self.build_request(method, path, body, Some(format!("Bearer {}", access_token)));
        self.transport.send(replay).await
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        bearer: Option<String>,
    ) -> HttpRequest {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("accept".to_string(), "application/json".to_string());
        if let Some(bearer) = bearer {
            headers.insert("authorization".to_string(), bearer);
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url, path),
            headers,
            body,
            timeout: Some(self.config.timeout),
        }
    }
}
