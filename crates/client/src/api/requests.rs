//! Booking-request endpoints.

use meetflow_protocol::{BookingRequest, RequestPage, RequestStatus, UpdateRequestRequest};

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `GET request/page?userId=…&page=…[&status=…]`.
pub async fn page(
    transport: &dyn Transport,
    user_id: &str,
    page: u32,
    status: Option<RequestStatus>,
) -> Result<RequestPage> {
    let mut request = ApiRequest::get("request/page")
        .with_query("userId", user_id)
        .with_query("page", page);
    if let Some(status) = status {
        request = request.with_query("status", status);
    }
    let response = transport.execute(request).await?;
    super::decode(response)
}

/// `PUT request/update`, used for accept and decline.
pub async fn update(transport: &dyn Transport, request: &UpdateRequestRequest) -> Result<Option<BookingRequest>> {
    let response = transport
        .execute(ApiRequest::put("request/update", super::encode(request)?))
        .await?;
    super::decode_opt(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn page_filters_by_wire_status() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!({"requests": []}));

        page(&transport, "1", 1, Some(RequestStatus::Requested)).await.unwrap();

        let sent = transport.take_sent();
        assert!(sent[0].query.contains(&("status".to_string(), "solicitado".to_string())));
    }

    #[tokio::test]
    async fn update_sends_underscore_id_and_status() {
        let transport = FakeTransport::new();
        transport.push_json(200, json!(null));

        let body = UpdateRequestRequest { id: "9".to_string(), status: RequestStatus::Accepted };
        update(&transport, &body).await.unwrap();

        let sent = transport.take_sent();
        assert_eq!(sent[0].path, "request/update");
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["_id"], "9");
        assert_eq!(body["status"], "aceito");
    }
}
