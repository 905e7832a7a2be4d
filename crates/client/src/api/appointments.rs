//! Appointment endpoints.

use meetflow_protocol::{Appointment, AppointmentPage, CreateAppointmentRequest};

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `POST appointment/create`, issued after a request is accepted.
pub async fn create(transport: &dyn Transport, request: &CreateAppointmentRequest) -> Result<Option<Appointment>> {
    let response = transport
        .execute(ApiRequest::post("appointment/create", super::encode(request)?))
        .await?;
    super::decode_opt(response)
}

/// `GET appointment/page?userId=…&page=…`, the schedule view.
pub async fn page(transport: &dyn Transport, user_id: &str, page: u32) -> Result<AppointmentPage> {
    let response = transport
        .execute(
            ApiRequest::get("appointment/page")
                .with_query("userId", user_id)
                .with_query("page", page),
        )
        .await?;
    super::decode(response)
}
