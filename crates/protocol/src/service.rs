//! Service catalog shapes.

use serde::{Deserialize, Serialize};

/// A service offered by a professional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Duration in minutes.
    pub duration: u32,
    #[serde(default)]
    pub price: Option<f64>,
}

/// One page of `GET service/page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePage {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST service/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration: u32,
    #[serde(default)]
    pub price: Option<f64>,
}
