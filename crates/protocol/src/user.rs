//! User identity and profile shapes.

use serde::{Deserialize, Serialize};

/// Closed set of account roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Professional,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Professional => write!(f, "professional"),
        }
    }
}

/// Minimal identity returned alongside credentials on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Full account record as returned by `account/whoami`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Editable profile fields for a professional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub head_line: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_user_maps_underscore_id() {
        let json = r#"{"_id":"1","email":"a@b.com","role":"client"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.role, Role::Client);
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Professional).unwrap(), "\"professional\"");
        let role: Role = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, Role::Client);
    }

    #[test]
    fn profile_uses_camel_case_head_line() {
        let profile = Profile {
            name: "Ana".to_string(),
            email: "ana@meetflow.app".to_string(),
            head_line: Some("Therapist".to_string()),
            photo_url: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["headLine"], "Therapist");
    }
}
