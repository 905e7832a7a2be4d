//! Error taxonomy for the client.
//!
//! The enum is `Clone` so a single fetch failure can be fanned out to every
//! caller waiting on the same cache entry; io and serde failures are folded
//! into `Storage`/`Validation` messages at the boundary where they occur.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The remote rejected the presented credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure before a response was produced.
    #[error("network error: {0}")]
    Network(String),

    /// Malformed input caught before dispatch.
    #[error("validation error: {0}")]
    Validation(String),

    /// Non-2xx response from the API.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Durable storage read or write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// The operation's result was discarded because the caller went away.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
