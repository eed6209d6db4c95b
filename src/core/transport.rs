//! HTTP Transport
//!
//! HTTP client interface and implementations.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{AuthError, NetworkError};

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<String>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl ReqwestHttpTransport {
    /// Create new transport with the default timeout.
    pub fn new() -> Result<Self, AuthError> {
        Self::with_timeout(Duration::from_secs(15))
    }

    /// Create transport with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Configuration {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                AuthError::Network(NetworkError::Timeout { timeout })
            } else {
                AuthError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string().to_lowercase(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            AuthError::Protocol {
                message: format!("failed to read response body: {}", e),
            }
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

struct PathStub {
    fragment: String,
    responses: VecDeque<HttpResponse>,
    delay: Option<Duration>,
}

/// Mock HTTP transport for testing.
///
/// Responses are stubbed per URL fragment. A stub configured with a sequence
/// pops responses in order and keeps repeating the last one once the rest are
/// exhausted.
#[derive(Default)]
pub struct MockHttpTransport {
    stubs: Mutex<Vec<PathStub>>,
    default_response: Mutex<Option<HttpResponse>>,
    request_history: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `response` for every request whose URL contains `fragment`.
    pub fn stub_path(&self, fragment: &str, response: HttpResponse) -> &Self {
        self.stub_path_sequence(fragment, vec![response])
    }

    /// Respond with the given sequence for requests whose URL contains
    /// `fragment`; the last response repeats once the sequence is exhausted.
    pub fn stub_path_sequence(&self, fragment: &str, responses: Vec<HttpResponse>) -> &Self {
        self.stubs.lock().unwrap().push(PathStub {
            fragment: fragment.to_string(),
            responses: responses.into(),
            delay: None,
        });
        self
    }

    /// Delay responses for requests whose URL contains `fragment`.
    /// The stub must already exist.
    pub fn delay_path(&self, fragment: &str, delay: Duration) -> &Self {
        let mut stubs = self.stubs.lock().unwrap();
        if let Some(stub) = stubs.iter_mut().find(|s| s.fragment == fragment) {
            stub.delay = Some(delay);
        }
        self
    }

    /// Set the response used when no stub matches.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *self.default_response.lock().unwrap() = Some(response);
        self
    }

    /// Build a JSON response.
    pub fn json_response<T: serde::Serialize>(status: u16, body: &T) -> HttpResponse {
        HttpResponse {
            status,
            headers: [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: serde_json::to_string(body).unwrap(),
        }
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.request_history.lock().unwrap().clone()
    }

    /// Count requests whose URL contains `fragment`.
    pub fn requests_to(&self, fragment: &str) -> usize {
        self.request_history
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let url = request.url.clone();
        self.request_history.lock().unwrap().push(request);

        let (response, delay) = {
            let mut stubs = self.stubs.lock().unwrap();
            match stubs.iter_mut().find(|s| url.contains(&s.fragment)) {
                Some(stub) => {
                    let response = if stub.responses.len() > 1 {
                        stub.responses.pop_front()
                    } else {
                        stub.responses.front().cloned()
                    };
                    (response, stub.delay)
                }
                None => (self.default_response.lock().unwrap().clone(), None),
            }
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        response.ok_or_else(|| {
            AuthError::Network(NetworkError::ConnectionFailed {
                message: format!("no mock response stubbed for {}", url),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    #[tokio::test]
    async fn test_mock_stub_and_history() {
        let transport = MockHttpTransport::new();
        transport.stub_path(
            "/auth/me",
            MockHttpTransport::json_response(200, &serde_json::json!({"key": "value"})),
        );

        let response = transport
            .send(request("http://localhost/api/auth/me"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains("value"));

        assert_eq!(transport.get_requests().len(), 1);
        assert_eq!(transport.requests_to("/auth/me"), 1);
    }

    #[tokio::test]
    async fn test_mock_sequence_repeats_last() {
        let transport = MockHttpTransport::new();
        transport.stub_path_sequence(
            "/diary",
            vec![
                MockHttpTransport::json_response(401, &serde_json::json!({})),
                MockHttpTransport::json_response(200, &serde_json::json!({})),
            ],
        );

        let first = transport.send(request("http://x/diary")).await.unwrap();
        let second = transport.send(request("http://x/diary")).await.unwrap();
        let third = transport.send(request("http://x/diary")).await.unwrap();
        assert_eq!(first.status, 401);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
    }

    #[tokio::test]
    async fn test_mock_unstubbed_path_fails() {
        let transport = MockHttpTransport::new();
        let result = transport.send(request("http://x/unknown")).await;
        assert!(matches!(
            result,
            Err(AuthError::Network(NetworkError::ConnectionFailed { .. }))
        ));
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
