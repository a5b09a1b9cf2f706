use serde::Serialize;
use tracing::warn;

use super::{Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::config::DEFAULT_CLUSTER_COUNT;
use crate::model::decode_clusters;
use crate::view::{cluster_bars, cluster_cards, ClusterBar, ClusterCard};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClustersView {
    pub requested: u32,
    pub n_clusters: u64,
    pub choices: Vec<u32>,
    pub bars: Vec<ClusterBar>,
    pub cards: Vec<ClusterCard>,
}

pub struct ClustersPage {
    dashboard: Dashboard,
    n_clusters: u32,
    clusters: QueryObserver,
}

impl ClustersPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            n_clusters: DEFAULT_CLUSTER_COUNT,
            clusters: dashboard.observer(),
        }
    }

    pub fn cluster_count(&self) -> u32 {
        self.n_clusters
    }

    pub async fn load(&mut self) -> PageView<ClustersView> {
        self.dashboard
            .load(&mut self.clusters, &ApiRequest::clusters(self.n_clusters))
            .await;
        self.view()
    }

    /// Switch to `n_clusters` and always ask the server for a fresh partition.
    /// Counts outside the configured choices are rejected and return `None`.
    pub async fn set_cluster_count(&mut self, n_clusters: u32) -> Option<PageView<ClustersView>> {
        if !self.dashboard.config().is_allowed_cluster_count(n_clusters) {
            warn!("Rejected cluster count {}", n_clusters);
            return None;
        }
        self.n_clusters = n_clusters;
        self.dashboard
            .reload(&mut self.clusters, &ApiRequest::clusters(n_clusters))
            .await;
        Some(self.view())
    }

    pub fn view(&self) -> PageView<ClustersView> {
        PageView::from_state(self.clusters.state(), decode_clusters).map(|set| ClustersView {
            requested: self.n_clusters,
            n_clusters: set.n_clusters,
            choices: self.dashboard.config().cluster_choices.clone(),
            bars: cluster_bars(&set),
            cards: cluster_cards(&set),
        })
    }
}
