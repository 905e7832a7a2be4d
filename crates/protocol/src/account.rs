//! Account lookup payloads.

use serde::{Deserialize, Serialize};

use crate::user::AccountUser;

/// Response of `GET account/whoami`.
///
/// The request carries the refresh credential in a `refreshtoken` header;
/// the server answers with the account record and a fresh credential pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiResponse {
    pub user: AccountUser,
    pub refresh_token: String,
    pub access_token: String,
}
