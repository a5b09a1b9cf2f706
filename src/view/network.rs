use serde::Serialize;

use super::truncate_chars;
use crate::model::{Availability, NetworkAnalysis, NetworkEdge, NetworkGraph, NetworkNode, NetworkStats, NodeType};

pub const TOP_CONNECTED_ARTICLES: usize = 5;
pub const TOP_PAGERANK_NODES: usize = 5;
const PAGERANK_TITLE_CHARS: usize = 25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub nodes: u64,
    pub edges: u64,
    /// Density as a percentage with one decimal, e.g. `4.2%`.
    pub density: String,
    pub connected_components: u64,
}

pub fn network_summary(stats: &NetworkStats) -> NetworkSummary {
    NetworkSummary {
        nodes: stats.num_nodes,
        edges: stats.num_edges,
        density: format!("{:.1}%", stats.density * 100.0),
        connected_components: stats.connected_components,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionCount {
    pub connection_type: String,
    pub label: String,
    pub count: usize,
}

/// Edge counts per connection type, in the order each type first appears.
pub fn connection_counts(edges: &[NetworkEdge]) -> Vec<ConnectionCount> {
    let mut counts: Vec<ConnectionCount> = Vec::new();
    for edge in edges {
        match counts
            .iter_mut()
            .find(|c| c.connection_type == edge.connection_type)
        {
            Some(existing) => existing.count += 1,
            None => counts.push(ConnectionCount {
                connection_type: edge.connection_type.clone(),
                label: edge.connection_type.replace('_', " "),
                count: 1,
            }),
        }
    }
    counts
}

/// Distinct node types in first-seen order.
pub fn node_types(nodes: &[NetworkNode]) -> Vec<NodeType> {
    let mut types: Vec<NodeType> = Vec::new();
    for node in nodes {
        if !types.contains(&node.node_type) {
            types.push(node.node_type.clone());
        }
    }
    types
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedNode {
    pub id: String,
    pub label: String,
    pub domain: Option<String>,
    pub degree: u64,
    pub is_sme_related: bool,
}

impl From<&NetworkNode> for ConnectedNode {
    fn from(node: &NetworkNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            domain: node.domain.clone(),
            degree: node.degree,
            is_sme_related: node.is_sme_related,
        }
    }
}

fn by_degree(graph: &NetworkGraph, node_type: &NodeType) -> Vec<ConnectedNode> {
    let mut nodes: Vec<&NetworkNode> = graph
        .nodes
        .iter()
        .filter(|node| &node.node_type == node_type)
        .collect();
    nodes.sort_by(|a, b| b.degree.cmp(&a.degree));
    nodes.into_iter().map(ConnectedNode::from).collect()
}

/// The most connected articles, highest degree first.
pub fn most_connected_articles(graph: &NetworkGraph) -> Vec<ConnectedNode> {
    let mut nodes = by_degree(graph, &NodeType::Article);
    nodes.truncate(TOP_CONNECTED_ARTICLES);
    nodes
}

/// Every problem node, highest degree first.
pub fn problems_by_degree(graph: &NetworkGraph) -> Vec<ConnectedNode> {
    by_degree(graph, &NodeType::Problem)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub rank: usize,
    pub node_id: String,
    pub label: String,
    pub node_type: Option<NodeType>,
    pub score: String,
}

/// PageRank leaders resolved against the graph. Ids missing from the graph are shown raw.
pub fn pagerank_leaders(graph: &NetworkGraph, analysis: &NetworkAnalysis) -> Vec<RankedNode> {
    analysis
        .pagerank_top
        .iter()
        .take(TOP_PAGERANK_NODES)
        .enumerate()
        .map(|(i, (node_id, score))| {
            let node = graph.node(node_id);
            let label = match node {
                Some(node) if node.node_type == NodeType::Article => {
                    truncate_chars(&node.label, PAGERANK_TITLE_CHARS)
                }
                Some(node) => node.label.clone(),
                None => node_id.clone(),
            };
            RankedNode {
                rank: i + 1,
                node_id: node_id.clone(),
                label,
                node_type: node.map(|n| n.node_type.clone()),
                score: format!("{:.3}", score),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetrics {
    pub average_clustering: String,
    pub assortativity: String,
    pub article_avg_degree: String,
    pub article_max_closeness: String,
    pub problem_avg_degree: String,
    pub problem_max_closeness: String,
    pub communities: usize,
}

/// Headline metrics of the optional analysis; `None` when it has not been computed.
pub fn analysis_metrics(analysis: &Availability<NetworkAnalysis>) -> Option<AnalysisMetrics> {
    let analysis = analysis.as_ref()?;
    Some(AnalysisMetrics {
        average_clustering: format!("{:.3}", analysis.average_clustering),
        assortativity: analysis
            .assortativity
            .map(|a| format!("{:.3}", a))
            .unwrap_or_else(|| "N/A".to_string()),
        article_avg_degree: format!("{:.3}", analysis.article_nodes.degree.mean),
        article_max_closeness: format!("{:.3}", analysis.article_nodes.closeness.max),
        problem_avg_degree: format!("{:.3}", analysis.problem_nodes.degree.mean),
        problem_max_closeness: format!("{:.3}", analysis.problem_nodes.closeness.max),
        communities: analysis.communities.len(),
    })
}
