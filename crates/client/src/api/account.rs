//! Account endpoints.

use meetflow_protocol::WhoamiResponse;

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `GET account/whoami`. The refresh credential travels in a dedicated
/// `refreshtoken` header, matching the server's contract.
pub async fn whoami(transport: &dyn Transport, refresh_token: &str) -> Result<WhoamiResponse> {
    let response = transport
        .execute(ApiRequest::get("account/whoami").with_header("refreshtoken", refresh_token))
        .await?;
    super::decode(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;
    use serde_json::json;

    #[tokio::test]
    async fn whoami_sends_refresh_header() {
        let transport = FakeTransport::new();
        transport.push_json(
            200,
            json!({
                "user": {"_id": "1", "email": "a@b.com", "name": "Ana", "role": "client", "active": true},
                "refreshToken": "R2",
                "accessToken": "T2"
            }),
        );

        let response = whoami(&transport, "R").await.unwrap();
        assert_eq!(response.user.name, "Ana");

        let sent = transport.take_sent();
        assert_eq!(sent[0].path, "account/whoami");
        assert_eq!(sent[0].headers, vec![("refreshtoken".to_string(), "R".to_string())]);
    }
}
