use serde::Serialize;
use serde_json::Value;

use super::article::{decode_article_refs, ArticleRef};
use super::coerce::{as_count, as_string_list};
use super::{required_section, top_level, DecodeError};
use crate::api::Resource;

/// A server-computed thematic grouping of articles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: String,
    pub articles: Vec<ArticleRef>,
    /// Ranked, most characteristic first.
    pub top_terms: Vec<String>,
    pub size: u64,
}

/// `/clusters` payload. Clusters keep the server's key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSet {
    pub n_clusters: u64,
    pub clusters: Vec<Cluster>,
}

pub fn decode_clusters(value: &Value) -> Result<ClusterSet, DecodeError> {
    let root = top_level(value, Resource::Clusters)?;
    let section = required_section(root, "clusters", Resource::Clusters)?;

    let clusters: Vec<Cluster> = section
        .iter()
        .map(|(id, cluster)| {
            let context = format!("cluster {}", id);
            let articles = decode_article_refs(cluster.get("articles"), &context);
            let size = match cluster.get("size") {
                Some(size) => as_count(Some(size)),
                None => articles.len() as u64,
            };
            Cluster {
                id: id.clone(),
                top_terms: as_string_list(cluster.get("top_terms"), &context),
                articles,
                size,
            }
        })
        .collect();

    let n_clusters = match root.get("n_clusters") {
        Some(n) => as_count(Some(n)),
        None => clusters.len() as u64,
    };

    Ok(ClusterSet { n_clusters, clusters })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_clusters_keeps_key_order() {
        let set = decode_clusters(&json!({
            "n_clusters": 3,
            "clusters": {
                "2": { "articles": [{ "article_id": "a", "title": "A", "url": "u" }], "top_terms": ["loan", "bank"], "size": 12 },
                "0": { "articles": "oops", "top_terms": null, "size": "7" },
                "1": { "articles": [{ "article_id": "b" }, { "article_id": "c" }] }
            }
        }))
        .unwrap();

        let ids: Vec<&str> = set.clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "0", "1"]);
        assert_eq!(set.clusters[0].top_terms, vec!["loan", "bank"]);
        assert!(set.clusters[1].articles.is_empty());
        assert_eq!(set.clusters[1].size, 7);
        assert_eq!(set.clusters[2].size, 2);
        assert_eq!(set.n_clusters, 3);
    }

    #[test]
    fn test_clusters_section_required() {
        assert!(decode_clusters(&json!({ "n_clusters": 4 })).is_err());
        assert!(decode_clusters(&json!({ "clusters": [] })).is_err());
    }
}
