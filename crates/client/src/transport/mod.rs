//! Remote API boundary.
//!
//! The [`Transport`] trait is the seam between the client and the HTTP
//! stack: a request/response interface carrying a path, method, headers,
//! and a JSON-shaped body. [`HttpTransport`] is the production
//! implementation; [`fake::FakeTransport`] is an in-memory stand-in for
//! tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::Result;

pub mod fake;
mod http;

pub use fake::FakeTransport;
pub use http::HttpTransport;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request to the remote API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, without a leading slash.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Extra headers beyond the ambient `Authorization` bearer.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A response from the remote API.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Request/response interface to the remote API.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Ambient authentication headers attached to outbound requests.
///
/// Written only by the session manager; read by the transport on every
/// request.
#[derive(Debug, Default)]
pub struct AuthHeaders {
    inner: RwLock<AuthHeaderState>,
}

#[derive(Debug, Default)]
struct AuthHeaderState {
    bearer: Option<String>,
    refresh_token: Option<String>,
}

impl AuthHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&self, access_token: Option<&str>, refresh_token: &str) {
        let mut state = self.inner.write();
        state.bearer = access_token.map(|token| format!("Bearer {token}"));
        state.refresh_token = Some(refresh_token.to_string());
    }

    pub(crate) fn clear(&self) {
        let mut state = self.inner.write();
        state.bearer = None;
        state.refresh_token = None;
    }

    /// Full `Authorization` header value, if a session is active.
    pub fn bearer(&self) -> Option<String> {
        self.inner.read().bearer.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().refresh_token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builders_accumulate_query_and_headers() {
        let request = ApiRequest::get("service/page")
            .with_query("userId", "1")
            .with_query("page", 2)
            .with_header("refreshtoken", "R");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.headers[0].1, "R");
        assert!(request.body.is_none());
    }

    #[test]
    fn auth_headers_install_and_clear() {
        let headers = AuthHeaders::new();
        assert!(headers.bearer().is_none());

        headers.install(Some("T"), "R");
        assert_eq!(headers.bearer().as_deref(), Some("Bearer T"));
        assert_eq!(headers.refresh_token().as_deref(), Some("R"));

        headers.clear();
        assert!(headers.bearer().is_none());
        assert!(headers.refresh_token().is_none());
    }

    #[test]
    fn install_without_access_token_keeps_refresh_only() {
        let headers = AuthHeaders::new();
        headers.install(None, "R");
        assert!(headers.bearer().is_none());
        assert_eq!(headers.refresh_token().as_deref(), Some("R"));
    }
}
