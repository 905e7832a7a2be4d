//! Fake transport for testing against a scripted remote.
//!
//! Responses are queued ahead of time and handed out in order; every
//! executed request is recorded for inspection.
//!
//! # Example
//!
//! ```ignore
//! let transport = FakeTransport::new();
//! transport.push_json(200, json!({"accessToken": "T", ...}));
//! session.login("a@b.com", "secret").await?;
//! let sent = transport.take_sent();
//! assert_eq!(sent[0].path, "auth/login");
//! ```

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::{Error, Result};

/// In-memory transport with scripted responses.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    pub fn push_json(&self, status: u16, body: Value) {
        self.responses.lock().push_back(Ok(ApiResponse { status, body }));
    }

    /// Queue a transport-level failure.
    pub fn push_error(&self, error: Error) {
        self.responses.lock().push_back(Err(error));
    }

    /// Take all recorded requests, clearing the buffer.
    pub fn take_sent(&self) -> Vec<ApiRequest> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.sent.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network(format!("no scripted response for {}", request.path))))
    }
}
