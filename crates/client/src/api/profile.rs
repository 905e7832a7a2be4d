//! Profile endpoints.

use meetflow_protocol::Profile;
use serde_json::json;

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};

/// `GET profile/{userId}`.
pub async fn get(transport: &dyn Transport, user_id: &str) -> Result<Profile> {
    let response = transport.execute(ApiRequest::get(format!("profile/{user_id}"))).await?;
    super::decode(response)
}

/// `PUT profile/update/{userId}`. Returns the server's authoritative
/// profile when it echoes one back.
pub async fn update(transport: &dyn Transport, user_id: &str, profile: &Profile) -> Result<Option<Profile>> {
    let response = transport
        .execute(ApiRequest::put(format!("profile/update/{user_id}"), super::encode(profile)?))
        .await?;
    super::decode_opt(response)
}

/// `PUT profile/photo/{userId}`.
pub async fn attach_photo(transport: &dyn Transport, user_id: &str, photo_url: &str) -> Result<Option<Profile>> {
    let response = transport
        .execute(ApiRequest::put(
            format!("profile/photo/{user_id}"),
            json!({ "photoUrl": photo_url }),
        ))
        .await?;
    super::decode_opt(response)
}
