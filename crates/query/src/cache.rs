//! Page cache keyed by [`QueryKey`], with request coalescing and
//! namespace-scoped invalidation.
//!
//! The cache is the only shared mutable state of the query layer. It is written
//! in exactly two places: a settled fetch storing its page, and
//! [`QueryClient::invalidate`] marking a namespace stale.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use leadsync_client::ClientError;
use leadsync_core::{CacheConfig, Page, QueryKey, ResourceName};
use tokio::sync::broadcast;

use crate::error::QueryError;

type ErasedPage = Arc<dyn Any + Send + Sync>;
type FetchOutcome = Result<ErasedPage, Arc<ClientError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Broadcast after a namespace was marked stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub namespace: ResourceName,
}

/// How a [`QueryClient::fetch`] call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Fresh cached page, no network.
    Cache,
    /// Joined a fetch another caller already started.
    Coalesced,
    /// Started a new network fetch.
    Network,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub in_flight: usize,
    pub stale: usize,
}

#[derive(Default)]
struct CacheEntry {
    value: Option<ErasedPage>,
    updated_at: Option<Instant>,
    invalidated: bool,
    /// Sequence number of the newest fetch issued (or invalidation applied) for this key.
    latest_seq: u64,
    in_flight: Option<(u64, SharedFetch)>,
}

impl CacheEntry {
    fn is_fresh(&self, config: &CacheConfig) -> bool {
        self.value.is_some()
            && !self.invalidated
            && self.updated_at.is_some_and(|at| at.elapsed() < config.stale_time)
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    /// Client-wide sequence. Survives removal and eviction of entries, so a
    /// fetch issued before an entry was dropped can never match a later one.
    next_seq: u64,
}

impl CacheState {
    fn bump_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.saturating_add(1);
        self.next_seq
    }
}

/// Shared page cache for every resource.
pub struct QueryClient {
    state: Arc<Mutex<CacheState>>,
    config: CacheConfig,
    events: broadcast::Sender<Invalidation>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn downcast<T: Send + Sync + 'static>(
    key: QueryKey,
    value: ErasedPage,
) -> Result<Arc<Page<T>>, QueryError> {
    value.downcast::<Page<T>>().map_err(|_| QueryError::TypeMismatch { key: key.to_string() })
}

impl QueryClient {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { state: Arc::new(Mutex::new(CacheState::default())), config, events }
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the page for `key`, fetching it with `fetcher` only when needed.
    ///
    /// A fresh entry is returned as-is. If a fetch for the same key is already
    /// running, this call joins it instead of starting another. A result is
    /// stored only when it belongs to the newest fetch issued for the key.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
    ) -> Result<Arc<Page<T>>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>> + Send + 'static,
    {
        self.fetch_traced(key, fetcher).await.map(|(page, _)| page)
    }

    /// Like [`fetch`](Self::fetch), also reporting how the call was answered.
    pub async fn fetch_traced<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
    ) -> Result<(Arc<Page<T>>, FetchSource), QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>> + Send + 'static,
    {
        let (shared, source) = {
            let mut state = lock(&self.state);
            let seq = state.bump_seq();
            let entry = state.entries.entry(key).or_default();

            if entry.is_fresh(&self.config) {
                if let Some(value) = entry.value.clone() {
                    tracing::debug!(%key, "cache hit");
                    return downcast(key, value).map(|page| (page, FetchSource::Cache));
                }
            }

            if let Some((seq, shared)) = &entry.in_flight {
                tracing::debug!(%key, seq, "joining in-flight fetch");
                (shared.clone(), FetchSource::Coalesced)
            } else {
                entry.latest_seq = seq;
                let shared = self.spawn_fetch(key, seq, fetcher());
                entry.in_flight = Some((seq, shared.clone()));
                tracing::debug!(%key, seq, "fetch started");
                (shared, FetchSource::Network)
            }
        };

        let outcome = shared.await;
        self.evict_overflow();
        match outcome {
            Ok(value) => downcast(key, value).map(|page| (page, source)),
            Err(e) => Err(QueryError::Fetch(e)),
        }
    }

    fn spawn_fetch<T, Fut>(&self, key: QueryKey, seq: u64, fut: Fut) -> SharedFetch
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<Page<T>, ClientError>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        async move {
            let outcome = match fut.await {
                Ok(page) => Ok(Arc::new(page) as ErasedPage),
                Err(e) => Err(Arc::new(e)),
            };
            settle(&state, key, seq, &outcome);
            outcome
        }
        .boxed()
        .shared()
    }

    /// Any cached page for `key`, fresh or not. Never fetches.
    #[must_use]
    pub fn peek<T: Send + Sync + 'static>(&self, key: QueryKey) -> Option<Arc<Page<T>>> {
        let value = lock(&self.state).entries.get(&key).and_then(|e| e.value.clone())?;
        downcast(key, value).ok()
    }

    /// True when the next read of `key` will go to the network.
    #[must_use]
    pub fn is_stale(&self, key: QueryKey) -> bool {
        lock(&self.state).entries.get(&key).is_none_or(|e| !e.is_fresh(&self.config))
    }

    #[must_use]
    pub fn is_fetching(&self, key: QueryKey) -> bool {
        lock(&self.state).entries.get(&key).is_some_and(|e| e.in_flight.is_some())
    }

    /// Marks every cached page of `namespace` stale and supersedes its running
    /// fetches. Other namespaces are untouched. Returns the number of entries hit.
    pub fn invalidate(&self, namespace: ResourceName) -> usize {
        let count = {
            let mut state = lock(&self.state);
            let seq = state.bump_seq();
            let mut count = 0_usize;
            for (key, entry) in &mut state.entries {
                if !key.belongs_to(namespace) {
                    continue;
                }
                entry.invalidated = true;
                entry.in_flight = None;
                entry.latest_seq = seq;
                count = count.saturating_add(1);
            }
            count
        };
        tracing::debug!(resource = %namespace, entries = count, "namespace invalidated");
        // No subscribers is fine.
        let _ = self.events.send(Invalidation { namespace });
        count
    }

    /// Receiver of future [`Invalidation`] events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }

    /// Drops every entry of `namespace`, running fetches included.
    pub fn remove(&self, namespace: ResourceName) {
        lock(&self.state).entries.retain(|key, _| !key.belongs_to(namespace));
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let state = lock(&self.state);
        let mut stats = CacheStats { entries: state.entries.len(), ..CacheStats::default() };
        for entry in state.entries.values() {
            if entry.in_flight.is_some() {
                stats.in_flight = stats.in_flight.saturating_add(1);
            }
            if !entry.is_fresh(&self.config) {
                stats.stale = stats.stale.saturating_add(1);
            }
        }
        stats
    }

    /// Evicts the oldest settled entries beyond `max_entries`. Running fetches are kept.
    fn evict_overflow(&self) {
        let mut state = lock(&self.state);
        let overflow = state.entries.len().saturating_sub(self.config.max_entries);
        if overflow == 0 {
            return;
        }
        let mut settled: Vec<(QueryKey, Option<Instant>)> = state
            .entries
            .iter()
            .filter(|(_, e)| e.in_flight.is_none())
            .map(|(k, e)| (*k, e.updated_at))
            .collect();
        // Entries that never stored a page sort first.
        settled.sort_by_key(|(_, at)| *at);
        for (key, _) in settled.into_iter().take(overflow) {
            state.entries.remove(&key);
            tracing::debug!(%key, "evicted");
        }
    }
}

/// Writes a settled fetch back, unless a newer fetch for the key was issued meanwhile.
fn settle(state: &Mutex<CacheState>, key: QueryKey, seq: u64, outcome: &FetchOutcome) {
    let mut state = lock(state);
    let Some(entry) = state.entries.get_mut(&key) else {
        return;
    };
    if entry.in_flight.as_ref().is_some_and(|(s, _)| *s == seq) {
        entry.in_flight = None;
    }
    if entry.latest_seq != seq {
        tracing::warn!(%key, seq, latest = entry.latest_seq, "discarding superseded fetch result");
        return;
    }
    match outcome {
        Ok(value) => {
            entry.value = Some(Arc::clone(value));
            entry.updated_at = Some(Instant::now());
            entry.invalidated = false;
        },
        Err(e) => {
            tracing::debug!(%key, error = %e, "fetch failed, keeping previous page");
        },
    }
}
