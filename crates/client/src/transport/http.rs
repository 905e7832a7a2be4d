//! HTTP implementation of the transport over reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use meetflow_protocol::ApiErrorBody;
use serde_json::Value;
use tracing::debug;

use super::{ApiRequest, ApiResponse, AuthHeaders, Method, Transport};
use crate::error::{Error, Result};

/// Transport backed by a real HTTP client.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AuthHeaders>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration, auth: Arc<AuthHeaders>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(format!("failed to build http client: {e}")))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url, auth })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = self.url(&request.path);
        debug!(target = "meetflow.http", method = request.method.as_str(), %url, "dispatching request");

        let mut builder = self.client.request(method, &url).query(&request.query);
        if let Some(bearer) = self.auth.bearer() {
            builder = builder.header("Authorization", bearer);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let body: Value = if response.content_length() == Some(0) {
            Value::Null
        } else {
            response.json().await.unwrap_or(Value::Null)
        };

        if (200..300).contains(&status) {
            return Ok(ApiResponse { status, body });
        }

        let message = serde_json::from_value::<ApiErrorBody>(body.clone())
            .ok()
            .and_then(|err| err.message)
            .unwrap_or_else(|| format!("request to {url} returned status {status}"));

        debug!(target = "meetflow.http", status, %message, "request rejected");
        Err(status_error(status, message))
    }
}

/// 401 means the credentials themselves were rejected; every other non-2xx
/// status, 403 included, is an API-level refusal.
fn status_error(status: u16, message: String) -> Error {
    match status {
        401 => Error::Authentication(message),
        _ => Error::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(base, Duration::from_secs(1), Arc::new(AuthHeaders::new())).unwrap()
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let t = transport("http://localhost:3333/");
        assert_eq!(t.url("auth/login"), "http://localhost:3333/auth/login");
        assert_eq!(t.url("/auth/login"), "http://localhost:3333/auth/login");
    }

    #[test]
    fn only_401_maps_to_authentication() {
        assert!(status_error(401, "expired".to_string()).is_authentication());
        assert!(matches!(status_error(403, "forbidden".to_string()), Error::Api { status: 403, .. }));
        assert!(matches!(status_error(500, "boom".to_string()), Error::Api { status: 500, .. }));
    }
}
