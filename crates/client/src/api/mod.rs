//! Typed wrappers over the remote API's endpoints.
//!
//! One submodule per API area. Each operation takes the transport seam,
//! builds the request, and decodes the response into the protocol crate's
//! types. No caching or session logic lives here.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::transport::ApiResponse;

pub mod account;
pub mod appointments;
pub mod auth;
pub mod profile;
pub mod requests;
pub mod services;

pub(crate) fn encode<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::Storage(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    let status = response.status;
    serde_json::from_value(response.body).map_err(|e| Error::Api {
        status,
        message: format!("unexpected response shape: {e}"),
    })
}

/// Like [`decode`], but a `null` or absent body decodes to `None`.
pub(crate) fn decode_opt<T: DeserializeOwned>(response: ApiResponse) -> Result<Option<T>> {
    if response.body.is_null() {
        return Ok(None);
    }
    decode(response).map(Some)
}
