//! Appointment shapes.

use serde::{Deserialize, Serialize};

/// A confirmed appointment on a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_name: String,
    pub client_name: String,
    pub professional_name: String,
    /// Duration in minutes.
    pub duration: u32,
    /// ISO-8601 start instant.
    pub init_date: String,
}

/// One page of `GET appointment/page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPage {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST appointment/create`, issued when a request is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub request_id: String,
    pub service_id: String,
    pub init_date: String,
    #[serde(default)]
    pub message: Option<String>,
}
