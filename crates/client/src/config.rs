//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default request timeout; the web client used the same 3 seconds once a
/// session was established.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Default number of cache entries retained before eviction kicks in.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Settings for constructing a [`MeetFlow`](crate::MeetFlow) client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote API, e.g. `http://localhost:3333`.
    pub base_url: String,
    /// Location of the durable credential store.
    pub credentials_path: PathBuf,
    pub request_timeout: Duration,
    pub cache_capacity: usize,
}

impl Config {
    pub fn new(base_url: impl Into<String>, credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials_path: credentials_path.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}
