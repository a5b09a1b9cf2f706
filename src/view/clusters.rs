use serde::Serialize;

use super::remainder_note;
use crate::model::{ArticleRef, Cluster, ClusterSet};

pub const CLUSTER_TERMS_SHOWN: usize = 6;
pub const CLUSTER_SAMPLE_ARTICLES: usize = 3;

/// One bar of the cluster size chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterBar {
    pub id: String,
    pub label: String,
    pub size: u64,
    pub top_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterCard {
    pub label: String,
    pub size: u64,
    pub terms: Vec<String>,
    pub sample_articles: Vec<ArticleRef>,
    pub more: Option<String>,
}

pub fn cluster_label(id: &str) -> String {
    format!("Cluster {}", id)
}

/// Chart rows in the order the server listed the clusters.
pub fn cluster_bars(set: &ClusterSet) -> Vec<ClusterBar> {
    set.clusters
        .iter()
        .map(|cluster| ClusterBar {
            id: cluster.id.clone(),
            label: cluster_label(&cluster.id),
            size: cluster.size,
            top_term: cluster
                .top_terms
                .first()
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect()
}

pub fn cluster_card(cluster: &Cluster) -> ClusterCard {
    ClusterCard {
        label: cluster_label(&cluster.id),
        size: cluster.size,
        terms: cluster.top_terms.iter().take(CLUSTER_TERMS_SHOWN).cloned().collect(),
        sample_articles: cluster
            .articles
            .iter()
            .take(CLUSTER_SAMPLE_ARTICLES)
            .cloned()
            .collect(),
        more: remainder_note(cluster.articles.len(), CLUSTER_SAMPLE_ARTICLES),
    }
}

pub fn cluster_cards(set: &ClusterSet) -> Vec<ClusterCard> {
    set.clusters.iter().map(cluster_card).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode_clusters;
    use serde_json::json;

    fn sample() -> ClusterSet {
        decode_clusters(&json!({
            "n_clusters": 3,
            "clusters": {
                "2": {
                    "articles": [
                        { "article_id": "a", "title": "A" },
                        { "article_id": "b", "title": "B" },
                        { "article_id": "c", "title": "C" },
                        { "article_id": "d", "title": "D" },
                        { "article_id": "e", "title": "E" }
                    ],
                    "top_terms": ["loan", "bank", "rate", "credit", "debt", "grant", "cash"],
                    "size": 5
                },
                "0": { "articles": [], "top_terms": [], "size": 0 },
                "1": { "articles": [{ "article_id": "f", "title": "F" }], "top_terms": "oops", "size": "1" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_bars_follow_server_order() {
        let bars = cluster_bars(&sample());
        let labels: Vec<_> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Cluster 2", "Cluster 0", "Cluster 1"]);
        assert_eq!(bars[0].top_term, "loan");
        assert_eq!(bars[1].top_term, "Unknown");
        assert_eq!(bars[2].top_term, "Unknown");
        assert_eq!(bars[2].size, 1);
    }

    #[test]
    fn test_cards_truncate_terms_and_articles() {
        let cards = cluster_cards(&sample());
        assert_eq!(cards[0].terms.len(), CLUSTER_TERMS_SHOWN);
        assert_eq!(cards[0].sample_articles.len(), CLUSTER_SAMPLE_ARTICLES);
        assert_eq!(cards[0].more.as_deref(), Some("and 2 more"));
        assert_eq!(cards[2].more, None);
        assert!(cards[1].terms.is_empty());
    }
}
