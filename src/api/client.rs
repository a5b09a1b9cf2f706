//! HTTP client creation and request handling for the analytics API.

use anyhow::{anyhow, Result};
use reqwest::header;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ApiRequest, ArticleFilter, FetchError, Resource, USER_AGENT};
use super::util::build_url;
use crate::config::DashboardConfig;
use crate::TARGET_WEB_REQUEST;

/// Read-only client for the analytics API. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for the API at `config.api_url`.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| anyhow!("Invalid API base URL {}: {}", base_url, e))?;

        debug!(target: TARGET_WEB_REQUEST, "Creating API client for {}", base_url);

        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url,
            timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform `request` and parse the body as JSON.
    ///
    /// Any non-success status is a [`FetchError::Status`]; no body is inspected in that case.
    pub async fn send(&self, request: &ApiRequest) -> Result<Value, FetchError> {
        let resource = request.resource;
        let url = build_url(
            &self.base_url,
            resource,
            request.id.as_deref(),
            &request.params,
        )
        .ok_or_else(|| FetchError::Transport {
            resource,
            message: format!("cannot build URL from base {}", self.base_url),
        })?;

        debug!(target: TARGET_WEB_REQUEST, "GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(resource, e))?;

        let status = response.status();
        debug!(target: TARGET_WEB_REQUEST, "GET {} returned {}", url, status);
        if !status.is_success() {
            warn!(target: TARGET_WEB_REQUEST, "Request for {} failed with status {}", resource, status);
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(resource, e))?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(target: TARGET_WEB_REQUEST, "Response for {} was not valid JSON: {}", resource, e);
            FetchError::InvalidJson {
                resource,
                message: e.to_string(),
            }
        })
    }

    fn transport_error(&self, resource: Resource, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            warn!(target: TARGET_WEB_REQUEST, "Request for {} timed out", resource);
            FetchError::Timeout {
                resource,
                seconds: self.timeout.as_secs(),
            }
        } else {
            warn!(target: TARGET_WEB_REQUEST, "Request for {} failed: {}", resource, err);
            FetchError::Transport {
                resource,
                message: err.to_string(),
            }
        }
    }

    /// Corpus-wide aggregate counters.
    pub async fn get_stats(&self) -> Result<Value, FetchError> {
        self.send(&ApiRequest::stats()).await
    }

    /// One page of articles plus pagination metadata.
    pub async fn get_articles(
        &self,
        page: u32,
        per_page: u32,
        filter: &ArticleFilter,
    ) -> Result<Value, FetchError> {
        self.send(&ApiRequest::articles(page, per_page, filter)).await
    }

    /// A single article; a missing id surfaces as a 404 [`FetchError::Status`].
    pub async fn get_article(&self, id: &str) -> Result<Value, FetchError> {
        self.send(&ApiRequest::article(id)).await
    }

    pub async fn search_articles(
        &self,
        query: &str,
        is_sme_related: Option<bool>,
    ) -> Result<Value, FetchError> {
        self.send(&ApiRequest::search(query, is_sme_related)).await
    }

    pub async fn get_sentiment(&self) -> Result<Value, FetchError> {
        self.send(&ApiRequest::sentiment()).await
    }

    /// A fresh partition of the corpus into `n_clusters` groups.
    pub async fn get_clusters(&self, n_clusters: u32) -> Result<Value, FetchError> {
        self.send(&ApiRequest::clusters(n_clusters)).await
    }

    pub async fn get_problems(&self) -> Result<Value, FetchError> {
        self.send(&ApiRequest::problems()).await
    }

    pub async fn get_network(&self) -> Result<Value, FetchError> {
        self.send(&ApiRequest::network()).await
    }

    /// Derived graph metrics. The server may not have computed them yet.
    pub async fn get_network_analysis(&self) -> Result<Value, FetchError> {
        self.send(&ApiRequest::network_analysis()).await
    }

    /// Deep per-article analysis. The server may not have computed it yet.
    pub async fn get_analysis(&self, article_id: &str) -> Result<Value, FetchError> {
        self.send(&ApiRequest::analysis(article_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&DashboardConfig::default().with_api_url(base_url)).unwrap()
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = client_for("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");
    }

    #[test]
    fn test_client_rejects_invalid_base_url() {
        let config = DashboardConfig::default().with_api_url("localhost without scheme");
        assert!(ApiClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_articles_sends_only_defined_filters() {
        let app = Router::new().route(
            "/articles",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({ "echo": params }))
            }),
        );
        let client = client_for(&serve(app).await);

        let body = client
            .get_articles(2, 20, &ArticleFilter::default())
            .await
            .unwrap();
        assert_eq!(body["echo"], json!({ "page": "2", "per_page": "20" }));

        let body = client
            .get_articles(1, 10, &ArticleFilter::default().domain("bbc.co.uk").sme_related(true))
            .await
            .unwrap();
        assert_eq!(
            body["echo"],
            json!({ "page": "1", "per_page": "10", "domain": "bbc.co.uk", "is_sme_related": "true" })
        );
    }

    #[tokio::test]
    async fn test_missing_article_is_not_found() {
        let app = Router::new().route(
            "/article/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "known" {
                    Ok(Json(json!({ "_id": "known" })))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        );
        let client = client_for(&serve(app).await);

        assert_eq!(client.get_article("known").await.unwrap()["_id"], "known");

        let err = client.get_article("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.resource(), Resource::Article);
    }

    #[tokio::test]
    async fn test_server_error_and_bad_json() {
        let app = Router::new()
            .route("/stats", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/sentiment", get(|| async { "<html>oops</html>" }));
        let client = client_for(&serve(app).await);

        assert_eq!(
            client.get_stats().await.unwrap_err(),
            FetchError::Status {
                resource: Resource::Stats,
                status: 500
            }
        );
        assert!(matches!(
            client.get_sentiment().await.unwrap_err(),
            FetchError::InvalidJson {
                resource: Resource::Sentiment,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}", addr));
        let err = client.get_network().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport {
                resource: Resource::Network,
                ..
            }
        ));
    }
}
