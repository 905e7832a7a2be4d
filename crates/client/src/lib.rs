//! Client library for the MeetFlow scheduling API.
//!
//! Wires the remote HTTP boundary, durable credential storage, the session
//! lifecycle, and the optimistic cache coordinator behind one facade.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod store;
pub mod transport;

/// Fixed lifetime of persisted session entries.
///
/// Matches the 30-day cookie expiry the web client uses for its session
/// entries.
pub const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

pub use cache::{
    CacheCoordinator, CacheUpdate, EntryState, Mutation, MutationTransaction, QueryKey,
    Subscription, TransactionStatus,
};
pub use client::MeetFlow;
pub use config::Config;
pub use error::{Error, Result};
pub use notify::{Notifier, NullNotifier, Severity};
pub use session::SessionManager;
pub use store::CredentialStore;
pub use transport::{ApiRequest, ApiResponse, AuthHeaders, HttpTransport, Method, Transport};
