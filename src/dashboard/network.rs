use serde::Serialize;

use super::{availability, Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::model::{decode_network, decode_network_analysis, Availability, NodeType};
use crate::view::{
    analysis_metrics, connection_counts, most_connected_articles, network_summary, node_types, pagerank_leaders,
    problems_by_degree, AnalysisMetrics, ConnectedNode, ConnectionCount, NetworkSummary, RankedNode,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkView {
    pub summary: NetworkSummary,
    pub connections: Vec<ConnectionCount>,
    pub node_types: Vec<NodeType>,
    pub top_articles: Vec<ConnectedNode>,
    pub problems: Vec<ConnectedNode>,
    /// Empty when the analysis has not been computed.
    pub pagerank: Vec<RankedNode>,
    pub metrics: Option<AnalysisMetrics>,
}

pub struct NetworkPage {
    dashboard: Dashboard,
    graph: QueryObserver,
    analysis: QueryObserver,
}

impl NetworkPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            graph: dashboard.observer(),
            analysis: dashboard.observer(),
        }
    }

    pub async fn load(&mut self) -> PageView<NetworkView> {
        let (graph, analysis) = (ApiRequest::network(), ApiRequest::network_analysis());
        tokio::join!(
            self.dashboard.load(&mut self.graph, &graph),
            self.dashboard.load(&mut self.analysis, &analysis),
        );
        self.view()
    }

    pub fn view(&self) -> PageView<NetworkView> {
        let analysis = availability(self.analysis.state(), decode_network_analysis);
        PageView::from_state(self.graph.state(), decode_network).map(|graph| NetworkView {
            summary: network_summary(&graph.stats),
            connections: connection_counts(&graph.edges),
            node_types: node_types(&graph.nodes),
            top_articles: most_connected_articles(&graph),
            problems: problems_by_degree(&graph),
            pagerank: match &analysis {
                Availability::Available(analysis) => pagerank_leaders(&graph, analysis),
                Availability::Unavailable => Vec::new(),
            },
            metrics: analysis_metrics(&analysis),
        })
    }
}
