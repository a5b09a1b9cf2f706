use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

use super::coerce::{as_bool, as_count, as_f64, as_list, as_non_empty_string, as_object};
use super::{top_level, DecodeError};
use crate::api::Resource;

/// Node kinds of the article/problem graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Article,
    Problem,
    Other(String),
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => NodeType::Article,
            "problem" => NodeType::Problem,
            other => NodeType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Article => write!(f, "article"),
            NodeType::Problem => write!(f, "problem"),
            NodeType::Other(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    pub id: String,
    pub node_type: NodeType,
    /// Article title or problem name, whichever applies.
    pub label: String,
    pub domain: Option<String>,
    pub degree: u64,
    pub is_sme_related: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub connection_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NetworkStats {
    pub num_nodes: u64,
    pub num_edges: u64,
    pub density: f64,
    pub connected_components: u64,
}

/// `/network` payload, fetched whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkGraph {
    pub stats: NetworkStats,
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl NetworkGraph {
    pub fn node(&self, id: &str) -> Option<&NetworkNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

fn decode_node(value: &Value) -> Option<NetworkNode> {
    let map = value.as_object()?;
    let id = as_non_empty_string(map.get("id"))?;
    let node_type = NodeType::from(
        as_non_empty_string(map.get("type"))
            .unwrap_or_default()
            .as_str(),
    );
    let label = match node_type {
        NodeType::Article => as_non_empty_string(map.get("title")),
        _ => as_non_empty_string(map.get("name")),
    }
    .or_else(|| as_non_empty_string(map.get("label")))
    .unwrap_or_else(|| id.clone());

    Some(NetworkNode {
        id,
        node_type,
        label,
        domain: as_non_empty_string(map.get("domain")),
        degree: as_count(map.get("degree")),
        is_sme_related: as_bool(map.get("is_sme_related")),
    })
}

fn decode_edge(value: &Value) -> Option<NetworkEdge> {
    let map = value.as_object()?;
    Some(NetworkEdge {
        source: as_non_empty_string(map.get("source"))?,
        target: as_non_empty_string(map.get("target"))?,
        connection_type: as_non_empty_string(map.get("connection_type"))
            .unwrap_or_else(|| "unknown".to_string()),
    })
}

pub fn decode_network(value: &Value) -> Result<NetworkGraph, DecodeError> {
    let root = top_level(value, Resource::Network)?;

    let stats = as_object(root.get("network_stats"), "network_stats")
        .map(|stats| NetworkStats {
            num_nodes: as_count(stats.get("num_nodes")),
            num_edges: as_count(stats.get("num_edges")),
            density: as_f64(stats.get("density")),
            connected_components: as_count(stats.get("connected_components")),
        })
        .unwrap_or_default();

    let raw_nodes = as_list(root.get("nodes"), "network nodes");
    let nodes: Vec<NetworkNode> = raw_nodes.iter().filter_map(decode_node).collect();
    if nodes.len() < raw_nodes.len() {
        warn!("Dropped {} network nodes without an id", raw_nodes.len() - nodes.len());
    }

    let raw_edges = as_list(root.get("edges"), "network edges");
    let edges: Vec<NetworkEdge> = raw_edges.iter().filter_map(decode_edge).collect();
    if edges.len() < raw_edges.len() {
        warn!("Dropped {} malformed network edges", raw_edges.len() - edges.len());
    }

    Ok(NetworkGraph { stats, nodes, edges })
}
