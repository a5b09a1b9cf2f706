//! Type definitions for the API module.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tokio::time::Duration;

/// Resources exposed by the analytics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resource {
    Stats,
    Articles,
    Article,
    Search,
    Sentiment,
    Clusters,
    Problems,
    Network,
    NetworkAnalysis,
    Analysis,
}

impl Resource {
    /// Name used in cache keys and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Stats => "stats",
            Resource::Articles => "articles",
            Resource::Article => "article",
            Resource::Search => "search",
            Resource::Sentiment => "sentiment",
            Resource::Clusters => "clusters",
            Resource::Problems => "problems",
            Resource::Network => "network",
            Resource::NetworkAnalysis => "network_analysis",
            Resource::Analysis => "analysis",
        }
    }

    /// Path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional equality filters for the article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ArticleFilter {
    pub domain: Option<String>,
    pub is_sme_related: Option<bool>,
}

impl ArticleFilter {
    pub fn domain(mut self, domain: &str) -> Self {
        let domain = domain.trim();
        self.domain = (!domain.is_empty()).then(|| domain.to_string());
        self
    }

    pub fn sme_related(mut self, is_sme_related: bool) -> Self {
        self.is_sme_related = Some(is_sme_related);
        self
    }

    /// Query parameters for the filters that are actually set.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(domain) = &self.domain {
            params.push(("domain".to_string(), domain.clone()));
        }
        if let Some(sme) = self.is_sme_related {
            params.push(("is_sme_related".to_string(), sme.to_string()));
        }
        params
    }
}

/// One GET against the API: resource, optional path id and ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiRequest {
    pub resource: Resource,
    pub id: Option<String>,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(resource: Resource) -> Self {
        Self {
            resource,
            id: None,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn stats() -> Self {
        Self::new(Resource::Stats)
    }

    /// Page numbers start at 1 and `per_page` is at least 1.
    pub fn articles(page: u32, per_page: u32, filter: &ArticleFilter) -> Self {
        let mut request = Self::new(Resource::Articles)
            .param("page", page.max(1))
            .param("per_page", per_page.max(1));
        request.params.extend(filter.to_params());
        request
    }

    pub fn article(id: &str) -> Self {
        let mut request = Self::new(Resource::Article);
        request.id = Some(id.to_string());
        request
    }

    pub fn search(query: &str, is_sme_related: Option<bool>) -> Self {
        let request = Self::new(Resource::Search).param("q", query);
        match is_sme_related {
            Some(sme) => request.param("is_sme_related", sme),
            None => request,
        }
    }

    pub fn sentiment() -> Self {
        Self::new(Resource::Sentiment)
    }

    pub fn clusters(n_clusters: u32) -> Self {
        Self::new(Resource::Clusters).param("n_clusters", n_clusters.max(1))
    }

    pub fn problems() -> Self {
        Self::new(Resource::Problems)
    }

    pub fn network() -> Self {
        Self::new(Resource::Network)
    }

    pub fn network_analysis() -> Self {
        Self::new(Resource::NetworkAnalysis)
    }

    pub fn analysis(article_id: &str) -> Self {
        let mut request = Self::new(Resource::Analysis);
        request.id = Some(article_id.to_string());
        request
    }
}

/// Failure to retrieve a resource. Callers must not assume any partial data exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("failed to fetch {resource}: {message}")]
    Transport { resource: Resource, message: String },
    #[error("failed to fetch {resource}: timed out after {seconds}s")]
    Timeout { resource: Resource, seconds: u64 },
    #[error("failed to fetch {resource}: server returned {status}")]
    Status { resource: Resource, status: u16 },
    #[error("failed to fetch {resource}: response was not JSON: {message}")]
    InvalidJson { resource: Resource, message: String },
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Transport { resource, .. }
            | FetchError::Timeout { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::InvalidJson { resource, .. } => *resource,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

// Constants
pub const USER_AGENT: &str = concat!("smedash/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
