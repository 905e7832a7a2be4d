//! Durable credential storage.
//!
//! A file-backed key-value store with per-entry expiry, standing in for the
//! browser cookie jar the web client used. Only the session manager writes
//! to it. Load is tolerant: a missing or corrupt file reads as empty.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const STORE_SCHEMA_VERSION: u32 = 1;

/// Store key for the access credential.
pub const KEY_ACCESS_TOKEN: &str = "meetFlow.token";
/// Store key for the refresh credential.
pub const KEY_REFRESH_TOKEN: &str = "meetFlow.refreshToken";
/// Store key for the serialized user identity.
pub const KEY_USER: &str = "meetFlow.user";

/// A stored value with its expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub value: String,
    /// Unix timestamp after which the entry is treated as absent.
    pub expires_at: u64,
}

/// On-disk format for the credential store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStoreFile {
    pub schema: u32,
    #[serde(default)]
    pub entries: HashMap<String, StoredEntry>,
}

impl Default for CredentialStoreFile {
    fn default() -> Self {
        Self {
            schema: STORE_SCHEMA_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// File-backed key-value store with per-entry expiry.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    file: CredentialStoreFile,
}

impl CredentialStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the live value for `key`, ignoring expired entries.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.file
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > now_ts())
            .map(|entry| entry.value.as_str())
    }

    /// Stores `value` under `key`, expiring `ttl_secs` from now.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>, ttl_secs: u64) {
        self.file.entries.insert(
            key.into(),
            StoredEntry {
                value: value.into(),
                expires_at: now_ts() + ttl_secs,
            },
        );
    }

    /// Removes `key`. Returns true if an entry was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.file.entries.remove(key).is_some()
    }

    /// Drops entries whose expiry has passed.
    pub fn prune_expired(&mut self) {
        let now = now_ts();
        self.file.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.file).map_err(|e| Error::Storage(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }
}

fn now_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
