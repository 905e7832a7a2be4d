//! Service catalog endpoints.

use meetflow_protocol::{CreateServiceRequest, Service, ServicePage};

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `GET service/page?userId=…&page=…`.
pub async fn page(transport: &dyn Transport, user_id: &str, page: u32) -> Result<ServicePage> {
    let response = transport
        .execute(
            ApiRequest::get("service/page")
                .with_query("userId", user_id)
                .with_query("page", page),
        )
        .await?;
    super::decode(response)
}

/// `POST service/create`.
pub async fn create(transport: &dyn Transport, request: &CreateServiceRequest) -> Result<Service> {
    let response = transport
        .execute(ApiRequest::post("service/create", super::encode(request)?))
        .await?;
    super::decode(response)
}
