//! Authentication endpoints.

use meetflow_protocol::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `POST auth/login`. The server expects the password twice.
pub async fn login(transport: &dyn Transport, request: &LoginRequest) -> Result<LoginResponse> {
    let response = transport
        .execute(ApiRequest::post("auth/login", super::encode(request)?))
        .await?;
    super::decode(response)
}

/// `POST user/register`.
pub async fn register(transport: &dyn Transport, request: &RegisterRequest) -> Result<RegisterResponse> {
    let response = transport
        .execute(ApiRequest::post("user/register", super::encode(request)?))
        .await?;
    super::decode(response)
}
