use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::key::QueryKey;
use super::state::QueryState;
use super::store::{CachePayload, QueryCache};
use crate::api::FetchError;
use crate::TARGET_CACHE;

/// Proof that a request was issued for a given key by a given observer generation.
///
/// Passing an outdated ticket to [`QueryObserver::complete`] is how late responses
/// are recognised and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: QueryKey,
    serial: u64,
}

impl Ticket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// One view's subscription to the cache.
///
/// While an observer points at a key the cache keeps that entry alive. Dropping the
/// observer releases it for garbage collection.
pub struct QueryObserver {
    cache: Arc<QueryCache>,
    key: Option<QueryKey>,
    serial: u64,
    state: QueryState<CachePayload>,
}

impl QueryObserver {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self {
            cache,
            key: None,
            serial: 0,
            state: QueryState::Idle,
        }
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &QueryState<CachePayload> {
        &self.state
    }

    /// Issue a request for `key`, switching to it if needed.
    ///
    /// The state becomes `Loading`. Its previous data is the cached payload of the new
    /// key when one exists, otherwise whatever this observer showed before.
    pub fn begin(&mut self, key: QueryKey) -> Ticket {
        let switched = self.key.as_ref() != Some(&key);
        if switched {
            self.cache.retain(&key);
            if let Some(old) = self.key.replace(key.clone()) {
                self.cache.release(&old);
            }
        }
        self.serial += 1;

        let state = std::mem::take(&mut self.state).begin();
        self.state = match (switched, self.cache.peek(&key)) {
            (true, Some(cached)) => QueryState::Loading {
                previous: Some(cached),
            },
            _ => state,
        };
        Ticket {
            key,
            serial: self.serial,
        }
    }

    /// Apply the outcome of `ticket`'s request. Returns false when the ticket is no longer
    /// current (the key changed or a newer request was issued) and the result was dropped.
    pub fn complete(&mut self, ticket: Ticket, result: Result<CachePayload, FetchError>) -> bool {
        if ticket.serial != self.serial || self.key.as_ref() != Some(&ticket.key) {
            debug!(target: TARGET_CACHE, "Discarding late response for {}", ticket.key);
            return false;
        }
        self.state = std::mem::take(&mut self.state).settle(result);
        true
    }

    /// Stop observing. Used when the query's precondition is false.
    pub fn disable(&mut self) {
        if let Some(old) = self.key.take() {
            self.cache.release(&old);
        }
        self.serial += 1;
        self.state = QueryState::Idle;
    }

    /// Fetch `key` through the cache and apply the result.
    pub async fn observe<F, Fut>(&mut self, key: QueryKey, fetcher: F) -> &QueryState<CachePayload>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        let ticket = self.begin(key);
        let result = self.cache.fetch(ticket.key(), fetcher).await;
        self.complete(ticket, result);
        &self.state
    }

    /// Force a network request for the current key. Does nothing while disabled.
    pub async fn refetch<F, Fut>(&mut self, fetcher: F) -> &QueryState<CachePayload>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        let Some(key) = self.key.clone() else {
            return &self.state;
        };
        let ticket = self.begin(key);
        let result = self.cache.refetch(ticket.key(), fetcher).await;
        self.complete(ticket, result);
        &self.state
    }
}

impl Drop for QueryObserver {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.cache.release(&key);
        }
    }
}
