use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::article::SentimentScores;
use super::coerce::{as_bool, as_count, as_f64, as_list, as_non_empty_string, as_object};
use super::{required_section, top_level, DecodeError};
use crate::api::Resource;

/// Aggregate sentiment over a slice of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentSummary {
    pub mean_compound: f64,
    pub positive_articles: u64,
    pub negative_articles: u64,
    pub neutral_articles: u64,
}

impl SentimentSummary {
    fn decode(map: &Map<String, Value>) -> Self {
        Self {
            mean_compound: as_f64(map.get("mean_compound")),
            positive_articles: as_count(map.get("positive_articles")),
            negative_articles: as_count(map.get("negative_articles")),
            neutral_articles: as_count(map.get("neutral_articles")),
        }
    }

    pub fn total(&self) -> u64 {
        self.positive_articles + self.negative_articles + self.neutral_articles
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSentiment {
    pub article_id: String,
    pub title: String,
    pub is_sme_related: bool,
    pub scores: SentimentScores,
}

/// `/sentiment` payload: a point-in-time snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub overall: SentimentSummary,
    pub sme_related: Option<SentimentSummary>,
    pub articles: Vec<ArticleSentiment>,
}

pub fn decode_sentiment(value: &Value) -> Result<SentimentReport, DecodeError> {
    let root = top_level(value, Resource::Sentiment)?;
    let overall = SentimentSummary::decode(required_section(root, "overall_sentiment", Resource::Sentiment)?);
    let sme_related = as_object(root.get("sme_related_sentiment"), "sme_related_sentiment")
        .map(SentimentSummary::decode);

    let articles = as_list(root.get("articles"), "sentiment articles")
        .iter()
        .filter_map(|item| {
            let map = item.as_object();
            if map.is_none() {
                warn!("Skipping invalid sentiment entry");
            }
            let map = map?;
            Some(ArticleSentiment {
                article_id: as_non_empty_string(map.get("article_id")).unwrap_or_default(),
                title: as_non_empty_string(map.get("title")).unwrap_or_else(|| "Untitled".to_string()),
                is_sme_related: as_bool(map.get("is_sme_related")),
                scores: map
                    .get("sentiment")
                    .and_then(SentimentScores::decode)
                    .unwrap_or_default(),
            })
        })
        .collect();

    Ok(SentimentReport {
        overall,
        sme_related,
        articles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_sentiment() {
        let report = decode_sentiment(&json!({
            "overall_sentiment": {
                "mean_compound": 0.12,
                "positive_articles": 40,
                "negative_articles": "10",
                "neutral_articles": 50
            },
            "articles": [
                { "article_id": "a1", "title": "Rates rise", "sentiment": { "compound": -0.4, "pos": 0.0, "neu": 0.6, "neg": 0.4 } },
                { "article_id": "a2", "title": "Grants open" },
                42
            ]
        }))
        .unwrap();

        assert_eq!(report.overall.negative_articles, 10);
        assert_eq!(report.overall.total(), 100);
        assert!(report.sme_related.is_none());
        assert_eq!(report.articles.len(), 2);
        assert_eq!(report.articles[0].scores.compound, -0.4);
        assert_eq!(report.articles[1].scores, SentimentScores::default());
    }

    #[test]
    fn test_missing_overall_is_invalid() {
        let err = decode_sentiment(&json!({ "articles": [] })).unwrap_err();
        assert_eq!(err.resource, Resource::Sentiment);
        assert!(err.reason.contains("overall_sentiment"));
    }
}
