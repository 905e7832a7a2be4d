//! Booking request shapes.
//!
//! Status values are the server's Portuguese wire strings; the typed enum
//! keeps callers from spelling them by hand.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    #[serde(rename = "solicitado")]
    Requested,
    #[serde(rename = "aceito")]
    Accepted,
    #[serde(rename = "recusado")]
    Declined,
    #[serde(rename = "agendado")]
    Scheduled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wire = match self {
            RequestStatus::Requested => "solicitado",
            RequestStatus::Accepted => "aceito",
            RequestStatus::Declined => "recusado",
            RequestStatus::Scheduled => "agendado",
        };
        write!(f, "{wire}")
    }
}

/// A client's request to book a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_name: String,
    pub client_name: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Duration in minutes.
    pub duration: u32,
    /// ISO-8601 start instant.
    pub init_date: String,
    pub status: RequestStatus,
}

/// One page of `GET request/page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPage {
    #[serde(default)]
    pub requests: Vec<BookingRequest>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `PUT request/update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_server_wire_values() {
        assert_eq!(serde_json::to_string(&RequestStatus::Requested).unwrap(), "\"solicitado\"");
        assert_eq!(serde_json::to_string(&RequestStatus::Accepted).unwrap(), "\"aceito\"");
        let status: RequestStatus = serde_json::from_str("\"recusado\"").unwrap();
        assert_eq!(status, RequestStatus::Declined);
    }

    #[test]
    fn request_page_tolerates_missing_fields() {
        let page: RequestPage = serde_json::from_str("{}").unwrap();
        assert!(page.requests.is_empty());
        assert!(page.total.is_none());
    }
}
