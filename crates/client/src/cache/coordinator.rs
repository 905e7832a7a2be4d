//! Optimistic cache coordinator.
//!
//! Wraps remote mutations with local cache pre-update, rollback-on-failure,
//! and post-success invalidation, so consumers see immediate feedback while
//! staying consistent with server truth.
//!
//! # Concurrency
//!
//! - Concurrent `query` calls on one key share a single in-flight fetch;
//!   late arrivals wait on a oneshot channel.
//! - `mutate` calls on one key are serialized behind a per-key async lock,
//!   so rollback always targets the value immediately prior to the most
//!   recent optimistic write.
//! - A generation counter guards against late fetch results overwriting a
//!   newer optimistic value, and drop guards clean up when a suspended
//!   caller is cancelled.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, mpsc, oneshot};
use tracing::{debug, warn};

use super::{CacheUpdate, EntryState, Mutation, MutationTransaction, QueryKey, TransactionStatus};
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::{Error, Result};

struct Entry {
    state: EntryState,
    value: Option<Value>,
    /// Bumped whenever a write supersedes an in-flight fetch.
    generation: u64,
    touched: u64,
    /// Invalidation requested while an operation was in flight; applied
    /// when the operation resolves.
    deferred_invalidation: bool,
    waiters: Vec<oneshot::Sender<Result<Value>>>,
    transaction: Option<MutationTransaction>,
}

impl Entry {
    fn new(touched: u64) -> Self {
        Self {
            state: EntryState::Loading,
            value: None,
            generation: 0,
            touched,
            deferred_invalidation: false,
            waiters: Vec::new(),
            transaction: None,
        }
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    subscribers: HashMap<QueryKey, Vec<(u64, mpsc::UnboundedSender<CacheUpdate>)>>,
    mutation_locks: HashMap<QueryKey, Arc<AsyncMutex<()>>>,
}

impl State {
    fn notify(&mut self, key: &QueryKey, update: CacheUpdate) {
        if let Some(subscribers) = self.subscribers.get_mut(key) {
            subscribers.retain(|(_, tx)| tx.send(update.clone()).is_ok());
            if subscribers.is_empty() {
                self.subscribers.remove(key);
            }
        }
    }

    fn invalidate(&mut self, key: &QueryKey) {
        let notify = match self.entries.get_mut(key) {
            Some(entry) => match entry.state {
                EntryState::Populated => {
                    entry.state = EntryState::Stale;
                    true
                }
                EntryState::Loading | EntryState::OptimisticallyUpdated => {
                    entry.deferred_invalidation = true;
                    false
                }
                EntryState::Stale => false,
            },
            None => false,
        };
        if notify {
            self.notify(key, CacheUpdate::Invalidated);
        }
    }

    /// Invalidates every entry covered by `pattern`, skipping `exclude`.
    fn invalidate_matching(&mut self, pattern: &QueryKey, exclude: Option<&QueryKey>) {
        let matched: Vec<QueryKey> = self
            .entries
            .keys()
            .filter(|key| pattern.covers(key) && exclude != Some(*key))
            .cloned()
            .collect();
        for key in &matched {
            self.invalidate(key);
        }
    }

    /// Evicts the least-recently-touched settled entry when at capacity.
    /// Entries that are loading or carry a pending transaction are never
    /// eviction candidates.
    fn evict_if_full(&mut self, capacity: usize) {
        if self.entries.len() < capacity {
            return;
        }
        let victim = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                matches!(entry.state, EntryState::Populated | EntryState::Stale)
                    && entry.transaction.is_none()
                    && entry.waiters.is_empty()
            })
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            debug!(target = "meetflow.cache", key = %key, "evicting least recently used entry");
            self.entries.remove(&key);
            self.notify(&key, CacheUpdate::Invalidated);
        }
    }
}

struct Shared {
    state: Mutex<State>,
    capacity: usize,
    tick: AtomicU64,
    next_subscriber: AtomicU64,
}

enum FetchOutcome {
    /// A newer write superseded this fetch; serve what is cached now.
    Superseded(Option<Value>),
    Stored {
        value: Value,
        waiters: Vec<oneshot::Sender<Result<Value>>>,
    },
    Failed {
        error: Error,
        waiters: Vec<oneshot::Sender<Result<Value>>>,
        removed: bool,
    },
}

impl Shared {
    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::SeqCst)
    }

    fn mutation_lock(&self, key: &QueryKey) -> Arc<AsyncMutex<()>> {
        let mut state = self.state.lock();
        state
            .mutation_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Applies a fetch result unless the entry moved on in the meantime.
    fn finish_fetch(&self, key: &QueryKey, generation: u64, result: Result<Value>) -> Result<Value> {
        let mut state = self.state.lock();
        let outcome = {
            let Some(entry) = state.entries.get_mut(key) else {
                return result;
            };
            if entry.generation != generation || entry.state != EntryState::Loading {
                FetchOutcome::Superseded(entry.value.clone())
            } else {
                let waiters = std::mem::take(&mut entry.waiters);
                match result {
                    Ok(value) => {
                        entry.value = Some(value.clone());
                        entry.state = if entry.deferred_invalidation {
                            EntryState::Stale
                        } else {
                            EntryState::Populated
                        };
                        entry.deferred_invalidation = false;
                        FetchOutcome::Stored { value, waiters }
                    }
                    Err(error) => {
                        let removed = entry.value.is_none();
                        if !removed {
                            entry.state = EntryState::Stale;
                        }
                        FetchOutcome::Failed { error, waiters, removed }
                    }
                }
            }
        };

        match outcome {
            FetchOutcome::Superseded(Some(value)) => Ok(value),
            FetchOutcome::Superseded(None) => Err(Error::Cancelled),
            FetchOutcome::Stored { value, waiters } => {
                for waiter in waiters {
                    let _ = waiter.send(Ok(value.clone()));
                }
                state.notify(key, CacheUpdate::Updated(value.clone()));
                Ok(value)
            }
            FetchOutcome::Failed { error, waiters, removed } => {
                if removed {
                    state.entries.remove(key);
                }
                for waiter in waiters {
                    let _ = waiter.send(Err(error.clone()));
                }
                Err(error)
            }
        }
    }

    /// Overwrites the cached value before the remote round-trip, recording
    /// a transaction so the write is fully reversible.
    fn apply_optimistic(&self, key: &QueryKey, pending: &Value) {
        let mut state = self.state.lock();
        if !state.entries.contains_key(key) {
            state.evict_if_full(self.capacity);
        }
        let tick = self.next_tick();
        let waiters = {
            let entry = state.entries.entry(key.clone()).or_insert_with(|| Entry::new(tick));
            entry.touched = tick;
            let prior = entry.value.clone();
            let prior_stale = entry.state == EntryState::Stale;
            entry.generation += 1;
            entry.value = Some(pending.clone());
            entry.state = EntryState::OptimisticallyUpdated;
            entry.transaction = Some(MutationTransaction {
                key: key.clone(),
                prior,
                pending: pending.clone(),
                status: TransactionStatus::Pending,
                prior_stale,
            });
            std::mem::take(&mut entry.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(Ok(pending.clone()));
        }
        state.notify(key, CacheUpdate::Updated(pending.clone()));
    }

    /// Settles a confirmed mutation and marks dependents stale.
    fn confirm(&self, key: &QueryKey, pending: Value, server_value: Option<Value>, invalidates: &[QueryKey]) -> Value {
        let mut state = self.state.lock();
        let authoritative = server_value.unwrap_or(pending);
        let applied = match state.entries.get_mut(key) {
            Some(entry) => {
                entry.transaction = None;
                entry.value = Some(authoritative.clone());
                entry.state = if entry.deferred_invalidation {
                    EntryState::Stale
                } else {
                    EntryState::Populated
                };
                entry.deferred_invalidation = false;
                true
            }
            None => false,
        };
        if applied {
            state.notify(key, CacheUpdate::Updated(authoritative.clone()));
        }
        for dependent in invalidates {
            state.invalidate_matching(dependent, Some(key));
        }
        authoritative
    }

    /// Restores the exact pre-mutation value and staleness marker.
    fn roll_back(&self, key: &QueryKey) {
        let mut state = self.state.lock();
        let restored = {
            let Some(entry) = state.entries.get_mut(key) else {
                return;
            };
            let Some(transaction) = entry.transaction.take() else {
                return;
            };
            let stale = transaction.prior_stale || entry.deferred_invalidation;
            entry.deferred_invalidation = false;
            match transaction.prior {
                Some(prior) => {
                    entry.value = Some(prior.clone());
                    entry.state = if stale { EntryState::Stale } else { EntryState::Populated };
                    Some(prior)
                }
                None => None,
            }
        };
        match restored {
            Some(prior) => state.notify(key, CacheUpdate::Updated(prior)),
            None => {
                state.entries.remove(key);
                state.notify(key, CacheUpdate::Invalidated);
            }
        }
    }
}

/// Resets a loading entry if the fetching caller is dropped mid-suspension,
/// so waiters are not stranded and no stale result lands later.
struct FetchGuard {
    shared: Arc<Shared>,
    key: QueryKey,
    generation: u64,
    armed: bool,
}

impl FetchGuard {
    fn complete(mut self, result: Result<Value>) -> Result<Value> {
        self.armed = false;
        self.shared.finish_fetch(&self.key, self.generation, result)
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.shared.finish_fetch(&self.key, self.generation, Err(Error::Cancelled));
        }
    }
}

/// Rolls a pending transaction back if the mutating caller is dropped
/// before the remote resolves.
struct MutationGuard {
    shared: Arc<Shared>,
    key: QueryKey,
    armed: bool,
}

impl MutationGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for MutationGuard {
    fn drop(&mut self) {
        if self.armed {
            self.shared.roll_back(&self.key);
        }
    }
}

/// Coordinates cached queries and optimistic mutations over a bounded
/// key-value store.
#[derive(Clone)]
pub struct CacheCoordinator {
    shared: Arc<Shared>,
}

impl CacheCoordinator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                capacity: capacity.max(1),
                tick: AtomicU64::new(0),
                next_subscriber: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the cached value for `key`, fetching it when absent or
    /// stale.
    ///
    /// Suspends the caller until the value is available. Concurrent callers
    /// for the same key share one fetch; the fetch error, if any, is
    /// propagated to all of them.
    pub async fn query<F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        enum Plan {
            Hit(Value),
            Wait(oneshot::Receiver<Result<Value>>),
            Fetch(u64),
        }

        let plan = {
            let mut state = self.shared.state.lock();
            let tick = self.shared.next_tick();
            match state.entries.get_mut(key) {
                Some(entry) => {
                    entry.touched = tick;
                    match entry.state {
                        EntryState::Populated | EntryState::OptimisticallyUpdated => match &entry.value {
                            Some(value) => Plan::Hit(value.clone()),
                            None => Plan::Hit(Value::Null),
                        },
                        EntryState::Loading => {
                            let (tx, rx) = oneshot::channel();
                            entry.waiters.push(tx);
                            Plan::Wait(rx)
                        }
                        EntryState::Stale => {
                            entry.state = EntryState::Loading;
                            entry.generation += 1;
                            Plan::Fetch(entry.generation)
                        }
                    }
                }
                None => {
                    state.evict_if_full(self.shared.capacity);
                    let mut entry = Entry::new(tick);
                    entry.generation = 1;
                    let generation = entry.generation;
                    state.entries.insert(key.clone(), entry);
                    Plan::Fetch(generation)
                }
            }
        };

        match plan {
            Plan::Hit(value) => Ok(value),
            Plan::Wait(rx) => rx.await.map_err(|_| Error::Cancelled)?,
            Plan::Fetch(generation) => {
                debug!(target = "meetflow.cache", key = %key, "fetching");
                let guard = FetchGuard {
                    shared: Arc::clone(&self.shared),
                    key: key.clone(),
                    generation,
                    armed: true,
                };
                let result = fetch().await;
                guard.complete(result)
            }
        }
    }

    /// Applies an optimistic mutation.
    ///
    /// The cached value is overwritten before `dispatch` runs. On success
    /// the optimistic value stays (or is replaced by the server's response
    /// when `dispatch` yields one) and the mutation's dependent keys are
    /// marked stale. On failure the prior value is restored exactly and the
    /// error is propagated.
    ///
    /// Mutations on the same key are serialized; a second call issued while
    /// the first is in flight queues behind it.
    pub async fn mutate<F, Fut>(&self, mutation: Mutation, dispatch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>>>,
    {
        let Mutation { key, value: pending, invalidates } = mutation;
        let lock = self.shared.mutation_lock(&key);
        let _serialized = lock.lock().await;

        self.shared.apply_optimistic(&key, &pending);
        let guard = MutationGuard {
            shared: Arc::clone(&self.shared),
            key: key.clone(),
            armed: true,
        };

        match dispatch().await {
            Ok(server_value) => {
                guard.disarm();
                let authoritative = self.shared.confirm(&key, pending, server_value, &invalidates);
                debug!(target = "meetflow.cache", key = %key, "mutation confirmed");
                Ok(authoritative)
            }
            Err(err) => {
                guard.disarm();
                self.shared.roll_back(&key);
                warn!(target = "meetflow.cache", key = %key, error = %err, "mutation failed; rolled back");
                Err(err)
            }
        }
    }

    /// Marks `key` stale so the next query refetches it. Deferred when the
    /// key has an operation in flight.
    pub fn invalidate(&self, key: &QueryKey) {
        self.shared.state.lock().invalidate(key);
    }

    /// Marks every entry covered by `pattern` stale; an unscoped pattern
    /// covers all scoped entries of its resource.
    pub fn invalidate_matching(&self, pattern: &QueryKey) {
        self.shared.state.lock().invalidate_matching(pattern, None);
    }

    /// Registers interest in `key`. Updates are pushed until the returned
    /// subscription is dropped.
    pub fn subscribe(&self, key: &QueryKey) -> Subscription {
        let id = self.shared.next_subscriber.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared
            .state
            .lock()
            .subscribers
            .entry(key.clone())
            .or_default()
            .push((id, tx));
        Subscription {
            id,
            key: key.clone(),
            rx,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Non-suspending read of whatever is currently cached.
    pub fn peek(&self, key: &QueryKey) -> Option<Value> {
        self.shared.state.lock().entries.get(key).and_then(|entry| entry.value.clone())
    }

    /// Current state of the entry, `None` for the implicit empty state.
    pub fn entry_state(&self, key: &QueryKey) -> Option<EntryState> {
        self.shared.state.lock().entries.get(key).map(|entry| entry.state)
    }

    /// The unresolved transaction for `key`, if a mutation is in flight.
    pub fn pending_transaction(&self, key: &QueryKey) -> Option<MutationTransaction> {
        self.shared
            .state
            .lock()
            .entries
            .get(key)
            .and_then(|entry| entry.transaction.clone())
    }

    pub fn entry_count(&self) -> usize {
        self.shared.state.lock().entries.len()
    }

    #[cfg(test)]
    fn subscriber_count(&self, key: &QueryKey) -> usize {
        self.shared
            .state
            .lock()
            .subscribers
            .get(key)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for CacheCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered interest in one cache key.
///
/// Dropping the subscription unregisters it; results arriving afterwards
/// are never delivered.
pub struct Subscription {
    id: u64,
    key: QueryKey,
    rx: mpsc::UnboundedReceiver<CacheUpdate>,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits for the next update on this key.
    pub async fn recv(&mut self) -> Option<CacheUpdate> {
        self.rx.recv().await
    }

    /// Returns an already-delivered update without suspending.
    pub fn try_recv(&mut self) -> Option<CacheUpdate> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mut state = shared.state.lock();
        if let Some(subscribers) = state.subscribers.get_mut(&self.key) {
            subscribers.retain(|(id, _)| *id != self.id);
            if subscribers.is_empty() {
                state.subscribers.remove(&self.key);
            }
        }
    }
}
