//! Page controllers.
//!
//! A [`Dashboard`] owns the session: configuration, API client and the one
//! [`QueryCache`] every page shares. Each page controller holds its parameters and one
//! [`QueryObserver`] per query, issues requests through the cache, and turns the
//! observed states into a [`PageView`] of view-models.

mod article_detail;
mod articles;
mod clusters;
mod network;
mod overview;
mod problems;
mod sentiment;

pub use self::article_detail::ArticleDetailPage;
pub use self::articles::{ArticlesPage, ArticlesView};
pub use self::clusters::{ClustersPage, ClustersView};
pub use self::network::{NetworkPage, NetworkView};
pub use self::overview::{OverviewPage, OverviewView};
pub use self::problems::{ProblemsPage, ProblemsView};
pub use self::sentiment::{SentimentPage, SentimentView};

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiRequest, FetchError};
use crate::cache::{CachePayload, QueryCache, QueryKey, QueryObserver, QueryState};
use crate::config::DashboardConfig;
use crate::model::{Availability, DecodeError};

/// What a page shows for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView<T> {
    /// The query is disabled.
    Idle,
    /// First load, nothing to show yet.
    Loading,
    /// Reloading; the data shown is from the previous successful load.
    Refreshing(T),
    Ready(T),
    /// "Failed to load", with a route back to a safe page.
    Failed(FetchError),
    /// The payload arrived but its structure cannot be rendered.
    Invalid(DecodeError),
}

impl<T> PageView<T> {
    /// Decode an observed state. Stale data that no longer decodes is treated as absent.
    pub fn from_state<F>(state: &QueryState<CachePayload>, decode: F) -> Self
    where
        F: Fn(&Value) -> Result<T, DecodeError>,
    {
        match state {
            QueryState::Idle => PageView::Idle,
            QueryState::Loading { previous: None } => PageView::Loading,
            QueryState::Loading {
                previous: Some(payload),
            } => decode(payload).map_or(PageView::Loading, PageView::Refreshing),
            QueryState::Success(payload) => match decode(payload) {
                Ok(data) => PageView::Ready(data),
                Err(err) => {
                    warn!("{}", err);
                    PageView::Invalid(err)
                }
            },
            QueryState::Error(err) => PageView::Failed(err.clone()),
        }
    }

    pub fn map<U, F>(self, f: F) -> PageView<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            PageView::Idle => PageView::Idle,
            PageView::Loading => PageView::Loading,
            PageView::Refreshing(data) => PageView::Refreshing(f(data)),
            PageView::Ready(data) => PageView::Ready(f(data)),
            PageView::Failed(err) => PageView::Failed(err),
            PageView::Invalid(err) => PageView::Invalid(err),
        }
    }

    /// Data to render, fresh or stale.
    pub fn data(&self) -> Option<&T> {
        match self {
            PageView::Refreshing(data) | PageView::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            PageView::Refreshing(data) | PageView::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageView::Loading | PageView::Refreshing(_))
    }
}

/// Optional resource from an observed state. Failures and absent payloads are
/// `Unavailable`, never errors.
pub fn availability<T, F>(state: &QueryState<CachePayload>, decode: F) -> Availability<T>
where
    F: Fn(&Value) -> Availability<T>,
{
    if let Some(err) = state.error() {
        warn!("Optional {} not available: {}", err.resource(), err);
        return Availability::Unavailable;
    }
    match state.data() {
        Some(payload) => decode(payload),
        None => Availability::Unavailable,
    }
}

/// One dashboard session.
#[derive(Clone)]
pub struct Dashboard {
    config: Arc<DashboardConfig>,
    api: ApiClient,
    cache: Arc<QueryCache>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let cache = Arc::new(QueryCache::from_config(&config));
        info!("Dashboard session started against {}", api.base_url());
        Ok(Self {
            config: Arc::new(config),
            api,
            cache,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn observer(&self) -> QueryObserver {
        QueryObserver::new(Arc::clone(&self.cache))
    }

    /// Network call for `request`, detached from `self` so the cache can share it.
    pub fn fetcher(
        &self,
        request: &ApiRequest,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Value, FetchError>> {
        let api = self.api.clone();
        let request = request.clone();
        move || async move { api.send(&request).await }.boxed()
    }

    /// Point `observer` at `request`, using cached data when it is fresh.
    pub async fn load<'a>(
        &self,
        observer: &'a mut QueryObserver,
        request: &ApiRequest,
    ) -> &'a QueryState<CachePayload> {
        observer
            .observe(QueryKey::from(request), self.fetcher(request))
            .await
    }

    /// Point `observer` at `request` and go to the network regardless of cached data.
    pub async fn reload<'a>(
        &self,
        observer: &'a mut QueryObserver,
        request: &ApiRequest,
    ) -> &'a QueryState<CachePayload> {
        let ticket = observer.begin(QueryKey::from(request));
        let result = self.cache.refetch(ticket.key(), self.fetcher(request)).await;
        observer.complete(ticket, result);
        observer.state()
    }

    pub fn collect_garbage(&self) -> usize {
        self.cache.collect_garbage()
    }

    /// End the session. Pending responses will find no entry to write to.
    pub fn shutdown(&self) {
        self.cache.clear();
        info!("Dashboard session closed");
    }
}
