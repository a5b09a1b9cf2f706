//! Optional enrichments: graph metrics and per-article deep analysis.
//!
//! Both may be missing on the server. Absence decodes to [`Availability::Unavailable`]
//! rather than an error so views can show a labelled fallback.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::coerce::{as_f64, as_f64_opt, as_list, as_non_empty_string, as_object, as_string_list};
use super::Availability;

/// Summary statistics of one centrality measure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CentralityStat {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NodeTypeCentrality {
    pub degree: CentralityStat,
    pub closeness: CentralityStat,
    pub betweenness: CentralityStat,
}

/// `(node id, score)` ranking, best first.
pub type Ranking = Vec<(String, f64)>;

/// `/network_analysis` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkAnalysis {
    pub average_clustering: f64,
    pub assortativity: Option<f64>,
    pub article_nodes: NodeTypeCentrality,
    pub problem_nodes: NodeTypeCentrality,
    pub communities: Vec<Vec<String>>,
    pub pagerank_top: Ranking,
    pub constraint_top: Ranking,
    pub effective_size_top: Ranking,
}

/// Payloads that mean "not computed": non-objects, `null`, or `{"error": ...}`.
fn available_object(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    if map.contains_key("error") || map.is_empty() {
        return None;
    }
    Some(map)
}

fn decode_stat(value: Option<&Value>) -> CentralityStat {
    as_object(value, "centrality measure")
        .map(|stat| CentralityStat {
            mean: as_f64(stat.get("mean")),
            max: as_f64(stat.get("max")),
            min: as_f64(stat.get("min")),
        })
        .unwrap_or_default()
}

fn decode_node_type(value: Option<&Value>) -> NodeTypeCentrality {
    as_object(value, "centrality summary")
        .map(|summary| NodeTypeCentrality {
            degree: decode_stat(summary.get("degree_centrality")),
            closeness: decode_stat(summary.get("closeness_centrality")),
            betweenness: decode_stat(summary.get("betweenness_centrality")),
        })
        .unwrap_or_default()
}

/// Accepts `[[id, score], ...]` as well as `[{"node": id, "score": s}, ...]`.
fn decode_ranking(value: Option<&Value>, context: &str) -> Ranking {
    as_list(value, context)
        .iter()
        .filter_map(|entry| match entry {
            Value::Array(pair) => Some((
                as_non_empty_string(pair.first())?,
                as_f64(pair.get(1)),
            )),
            Value::Object(map) => Some((
                as_non_empty_string(map.get("node").or_else(|| map.get("id")))?,
                as_f64(map.get("score")),
            )),
            _ => None,
        })
        .collect()
}

pub fn decode_network_analysis(value: &Value) -> Availability<NetworkAnalysis> {
    let Some(root) = available_object(value) else {
        debug!("Network analysis not available");
        return Availability::Unavailable;
    };

    let centrality = as_object(root.get("centrality_measures_summary"), "centrality_measures_summary");
    let advanced = as_object(root.get("advanced_analysis"), "advanced_analysis");

    let communities = advanced
        .map(|advanced| {
            as_list(advanced.get("communities"), "communities")
                .iter()
                .map(|community| as_string_list(Some(community), "community"))
                .collect()
        })
        .unwrap_or_default();

    Availability::Available(NetworkAnalysis {
        average_clustering: as_f64(root.get("average_clustering_coefficient")),
        assortativity: as_f64_opt(root.get("degree_assortativity_coefficient")),
        article_nodes: decode_node_type(centrality.and_then(|c| c.get("article_nodes"))),
        problem_nodes: decode_node_type(centrality.and_then(|c| c.get("problem_nodes"))),
        communities,
        pagerank_top: decode_ranking(advanced.and_then(|a| a.get("pagerank_top_10")), "pagerank_top_10"),
        constraint_top: decode_ranking(advanced.and_then(|a| a.get("constraint_top_10")), "constraint_top_10"),
        effective_size_top: decode_ranking(
            advanced.and_then(|a| a.get("effective_size_top_10")),
            "effective_size_top_10",
        ),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySentiment {
    pub entity: String,
    pub score: f64,
}

/// `/analysis/{id}` payload: deep per-article analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleAnalysis {
    pub summary: Option<String>,
    pub overall_sentiment: Option<f64>,
    /// Entity order follows the server.
    pub entity_sentiment: Vec<EntitySentiment>,
    /// `(tone, intensity)` pairs in server order.
    pub emotional_tone: Vec<(String, f64)>,
    pub sme_implications: Vec<String>,
}

pub fn decode_article_analysis(value: &Value) -> Availability<ArticleAnalysis> {
    let Some(root) = available_object(value) else {
        debug!("Article analysis not available");
        return Availability::Unavailable;
    };

    let entity_sentiment = as_object(root.get("entity_sentiment"), "entity_sentiment")
        .map(|entities| {
            entities
                .iter()
                .map(|(entity, score)| EntitySentiment {
                    entity: entity.clone(),
                    score: as_f64(Some(score)),
                })
                .collect()
        })
        .unwrap_or_default();

    let emotional_tone = as_object(root.get("emotional_tone"), "emotional_tone")
        .map(|tones| {
            tones
                .iter()
                .map(|(tone, intensity)| (tone.clone(), as_f64(Some(intensity))))
                .collect()
        })
        .unwrap_or_default();

    let analysis = ArticleAnalysis {
        summary: as_non_empty_string(root.get("summary")),
        overall_sentiment: as_f64_opt(root.get("overall_sentiment")),
        entity_sentiment,
        emotional_tone,
        sme_implications: as_string_list(root.get("sme_implications"), "sme_implications"),
    };

    let is_empty = analysis.summary.is_none()
        && analysis.overall_sentiment.is_none()
        && analysis.entity_sentiment.is_empty()
        && analysis.emotional_tone.is_empty()
        && analysis.sme_implications.is_empty();
    if is_empty {
        return Availability::Unavailable;
    }

    Availability::Available(analysis)
}
