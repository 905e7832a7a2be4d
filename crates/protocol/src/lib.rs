//! Wire types for the MeetFlow scheduling API.
//!
//! This crate contains the serde-serializable types exchanged with the
//! remote API over JSON. These types represent the "protocol layer" - the
//! shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with the API: Field names match the server's camelCase JSON
//! * Stable: Changes only when the wire contract changes
//!
//! Higher-level ergonomic APIs are built on top of these types in
//! `meetflow-client`.

pub mod account;
pub mod appointment;
pub mod auth;
pub mod request;
pub mod service;
pub mod types;
pub mod user;

pub use account::*;
pub use appointment::*;
pub use auth::*;
pub use request::*;
pub use service::*;
pub use types::*;
pub use user::*;
