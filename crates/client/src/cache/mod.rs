//! Cache keys, entry states, and mutation records.
//!
//! The coordinator itself lives in [`coordinator`]; this module holds the
//! data shapes shared with consumers.

use serde_json::Value;

mod coordinator;

pub use coordinator::{CacheCoordinator, Subscription};

/// Identifies a cached resource: a logical name plus optional scope, e.g.
/// `profile:42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: String,
    scope: Option<String>,
}

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            scope: None,
        }
    }

    pub fn scoped(resource: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            scope: Some(scope.into()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Whether this key, used as a pattern, covers `other`: same resource,
    /// and either no scope or an exact scope match. An unscoped pattern
    /// covers every cached page of its resource.
    pub fn covers(&self, other: &QueryKey) -> bool {
        self.resource == other.resource
            && self
                .scope
                .as_deref()
                .is_none_or(|scope| other.scope.as_deref() == Some(scope))
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}:{}", self.resource, scope),
            None => write!(f, "{}", self.resource),
        }
    }
}

/// Lifecycle state of a cache entry. An absent entry is the implicit
/// `Empty` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Loading,
    Populated,
    OptimisticallyUpdated,
    Stale,
}

/// Notification pushed to subscribers of a key.
#[derive(Debug, Clone)]
pub enum CacheUpdate {
    /// The cached value changed (optimistic write, confirmation, rollback,
    /// or fetch completion).
    Updated(Value),
    /// The value was marked stale or evicted; refetch before next use.
    Invalidated,
}

/// An optimistic mutation: the key to overwrite, the speculative value, and
/// the keys to mark stale once the remote confirms. Dependent keys act as
/// patterns: one without a scope covers all scoped entries of its resource.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub key: QueryKey,
    pub value: Value,
    pub invalidates: Vec<QueryKey>,
}

impl Mutation {
    pub fn new(key: QueryKey, value: Value) -> Self {
        Self {
            key,
            value,
            invalidates: Vec::new(),
        }
    }

    pub fn invalidating(mut self, key: QueryKey) -> Self {
        self.invalidates.push(key);
        self
    }
}

/// Resolution state of a mutation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    RolledBack,
}

/// Per-mutation record kept from optimistic write until confirm/rollback.
///
/// The prior value is retained in full so rollback can restore it exactly.
#[derive(Debug, Clone)]
pub struct MutationTransaction {
    pub key: QueryKey,
    pub prior: Option<Value>,
    pub pending: Value,
    pub status: TransactionStatus,
    /// Whether the entry was already stale before the optimistic write, so
    /// rollback restores the staleness marker too.
    pub(crate) prior_stale: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_key_display_includes_scope() {
        assert_eq!(QueryKey::new("servicesScheduled").to_string(), "servicesScheduled");
        assert_eq!(QueryKey::scoped("profile", "1").to_string(), "profile:1");
    }

    #[test]
    fn scoped_keys_are_distinct() {
        assert_ne!(QueryKey::scoped("profile", "1"), QueryKey::scoped("profile", "2"));
        assert_ne!(QueryKey::new("profile"), QueryKey::scoped("profile", "1"));
    }

    #[test]
    fn unscoped_pattern_covers_all_scopes_of_its_resource() {
        let pattern = QueryKey::new("servicesScheduled");
        assert!(pattern.covers(&QueryKey::scoped("servicesScheduled", "u1:1")));
        assert!(pattern.covers(&QueryKey::new("servicesScheduled")));
        assert!(!pattern.covers(&QueryKey::scoped("servicesRequest", "u1:1")));

        let exact = QueryKey::scoped("profile", "1");
        assert!(exact.covers(&QueryKey::scoped("profile", "1")));
        assert!(!exact.covers(&QueryKey::scoped("profile", "2")));
        assert!(!exact.covers(&QueryKey::new("profile")));
    }
}
