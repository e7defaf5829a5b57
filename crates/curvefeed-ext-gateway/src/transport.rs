//! HTTP transport abstraction.
//!
//! The gateway client talks to a [`HttpTransport`] rather than to reqwest
//! directly, so tests can answer with canned responses.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use curvefeed_traits::TraitError;

/// HTTP methods used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

/// Authentication applied to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    /// No authentication.
    None,
    /// `Authorization: Bearer <token>`.
    BearerToken(String),
}

impl HttpAuth {
    /// Bearer auth when a token is present.
    pub fn bearer(token: Option<String>) -> Self {
        token.map_or(HttpAuth::None, HttpAuth::BearerToken)
    }

    /// Writes the auth header.
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        match self {
            HttpAuth::None => {}
            HttpAuth::BearerToken(token) => {
                headers.insert("authorization".to_string(), format!("Bearer {}", token));
            }
        }
    }
}

/// Outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
    /// Body.
    pub body: Option<String>,
    /// Timeout in milliseconds.
    pub timeout_ms: u64,
}

impl HttpRequest {
    /// A POST with a JSON body.
    pub fn post_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers,
            body: Some(body.into()),
            timeout_ms: 30_000,
        }
    }

    /// Applies authentication.
    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self.headers);
        self
    }

    /// Sets the timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Response as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl HttpResponse {
    /// A 200 response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// True for 2xx.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Timed out.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Could not connect.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Anything else.
    #[error("request failed: {0}")]
    Request(String),
}

impl From<TransportError> for TraitError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout(_) => TraitError::Timeout,
            TransportError::Connect(message) => TraitError::ConnectionFailed(message),
            TransportError::Request(message) => TraitError::ConnectionFailed(message),
        }
    }
}

/// Executes HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the response, whatever its status.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<reqwest::Client>,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("curvefeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client)
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = builder.timeout(Duration::from_millis(request.timeout_ms));
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read body: {}", e)))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let request = HttpRequest::post_json("http://gw/api", "{}")
            .with_auth(&HttpAuth::bearer(Some("abc".into())));
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_no_token_no_header() {
        let request =
            HttpRequest::post_json("http://gw/api", "{}").with_auth(&HttpAuth::bearer(None));
        assert!(!request.headers.contains_key("authorization"));
    }

    #[test]
    fn test_transport_error_mapping() {
        assert_eq!(
            TraitError::from(TransportError::Timeout("slow".into())),
            TraitError::Timeout
        );
        assert!(matches!(
            TraitError::from(TransportError::Connect("refused".into())),
            TraitError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_status_classes() {
        assert!(HttpResponse::ok("").is_success());
        assert!(!HttpResponse {
            status: 502,
            body: String::new()
        }
        .is_success());
    }
}
