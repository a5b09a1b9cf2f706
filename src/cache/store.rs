use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info};

use super::key::QueryKey;
use crate::api::{FetchError, Resource};
use crate::config::DashboardConfig;
use crate::TARGET_CACHE;

/// Cached payloads are shared, never copied.
pub type CachePayload = Arc<Value>;

pub(crate) type FetchResult = Result<CachePayload, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct InFlight {
    generation: u64,
    started_at: Instant,
    future: SharedFetch,
}

/// Memo of one key: last good payload plus the in-flight marker used for deduplication.
struct CacheEntry {
    payload: Option<CachePayload>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    observers: usize,
    /// Set while no observer references the entry; drives garbage collection.
    released_at: Option<Instant>,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            payload: None,
            fetched_at: None,
            invalidated: false,
            in_flight: None,
            observers: 0,
            released_at: Some(Instant::now()),
        }
    }

    fn fresh_payload(&self, stale_time: Option<Duration>) -> Option<CachePayload> {
        if self.invalidated {
            return None;
        }
        let payload = self.payload.as_ref()?;
        if let (Some(limit), Some(fetched_at)) = (stale_time, self.fetched_at) {
            if fetched_at.elapsed() >= limit {
                return None;
            }
        }
        Some(Arc::clone(payload))
    }

    /// Apply a finished request. Results from a superseded generation are dropped.
    fn complete(&mut self, key: &QueryKey, generation: u64, result: &FetchResult) {
        if self.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
            debug!(target: TARGET_CACHE, "Discarding superseded result for {}", key);
            return;
        }
        self.in_flight = None;
        match result {
            Ok(payload) => {
                self.payload = Some(Arc::clone(payload));
                self.fetched_at = Some(Instant::now());
                self.invalidated = false;
                debug!(target: TARGET_CACHE, "Stored {}", key);
            }
            Err(err) => {
                debug!(target: TARGET_CACHE, "Request for {} failed, keeping previous payload: {}", key, err);
            }
        }
    }
}

/// Session-wide cache of API payloads keyed by [`QueryKey`].
///
/// At most one request per key is in flight; concurrent callers for that key await the
/// same shared future and receive the same `Arc`.
pub struct QueryCache {
    entries: Arc<DashMap<QueryKey, CacheEntry>>,
    generation: AtomicU64,
    network_calls: AtomicU64,
    stale_time: Option<Duration>,
    gc_time: Duration,
}

impl QueryCache {
    pub fn new(stale_time: Option<Duration>, gc_time: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            generation: AtomicU64::new(0),
            network_calls: AtomicU64::new(0),
            stale_time,
            gc_time,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.stale_time, config.gc_time)
    }

    /// Cached payload when fresh, otherwise the result of the in-flight or a new request.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        let future = {
            let mut entry = self.entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            let joined = entry.in_flight.as_ref().map(|f| f.future.clone());
            match joined {
                Some(future) => {
                    debug!(target: TARGET_CACHE, "Joining in-flight request for {}", key);
                    future
                }
                None => match entry.fresh_payload(self.stale_time) {
                    Some(payload) => {
                        debug!(target: TARGET_CACHE, "Cache hit for {}", key);
                        return Ok(payload);
                    }
                    None => self.start(key, &mut entry, fetcher),
                },
            }
        };
        future.await
    }

    /// Like [`fetch`](Self::fetch) but ignores cached data. Still joins a request that is
    /// already in flight, so a key never has two concurrent network calls.
    pub async fn refetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        let future = {
            let mut entry = self.entries.entry(key.clone()).or_insert_with(CacheEntry::new);
            let joined = entry.in_flight.as_ref().map(|f| f.future.clone());
            match joined {
                Some(future) => future,
                None => self.start(key, &mut entry, fetcher),
            }
        };
        future.await
    }

    fn start<F, Fut>(&self, key: &QueryKey, entry: &mut CacheEntry, fetcher: F) -> SharedFetch
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.network_calls.fetch_add(1, Ordering::Relaxed);
        debug!(target: TARGET_CACHE, "Requesting {} (generation {})", key, generation);

        let entries = Arc::clone(&self.entries);
        let owned_key = key.clone();
        let request = fetcher();
        let future = async move {
            let result = request.await.map(Arc::new);
            // The entry may have been collected or cleared meanwhile
            if let Some(mut entry) = entries.get_mut(&owned_key) {
                entry.complete(&owned_key, generation, &result);
            }
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(InFlight {
            generation,
            started_at: Instant::now(),
            future: future.clone(),
        });
        future
    }

    /// Last stored payload for `key`, fresh or not.
    pub fn peek(&self, key: &QueryKey) -> Option<CachePayload> {
        self.entries.get(key).and_then(|entry| entry.payload.clone())
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Mark `key` stale so the next fetch goes to the network. Returns whether it existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.invalidated = true;
                debug!(target: TARGET_CACHE, "Invalidated {}", key);
                true
            }
            None => false,
        }
    }

    /// Mark every key of `resource` stale. Returns how many entries were affected.
    pub fn invalidate_resource(&self, resource: Resource) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.key().resource == resource {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(target: TARGET_CACHE, "Invalidated {} entries for {}", count, resource);
        count
    }

    pub(crate) fn retain(&self, key: &QueryKey) {
        let mut entry = self.entries.entry(key.clone()).or_insert_with(CacheEntry::new);
        entry.observers += 1;
        entry.released_at = None;
    }

    pub(crate) fn release(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
            if entry.observers == 0 {
                entry.released_at = Some(Instant::now());
            }
        }
    }

    /// Drop entries no view has referenced for at least the gc time.
    ///
    /// A request younger than the gc time keeps its entry. An older one was abandoned by
    /// every caller and is never polled again, so its entry goes too.
    pub fn collect_garbage(&self) -> usize {
        let before = self.entries.len();
        let gc_time = self.gc_time;
        self.entries.retain(|_, entry| {
            entry.observers > 0
                || entry
                    .in_flight
                    .as_ref()
                    .is_some_and(|in_flight| in_flight.started_at.elapsed() < gc_time)
                || entry
                    .released_at
                    .map_or(true, |released| released.elapsed() < gc_time)
        });
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(target: TARGET_CACHE, "Collected {} unused entries", removed);
        }
        removed
    }

    /// Tear down the session: every entry is removed and pending results are discarded.
    pub fn clear(&self) {
        info!(target: TARGET_CACHE, "Clearing {} cache entries", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of network requests started over the lifetime of the cache.
    pub fn network_calls(&self) -> u64 {
        self.network_calls.load(Ordering::Relaxed)
    }
}
