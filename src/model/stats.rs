use serde::Serialize;
use serde_json::Value;

use super::coerce::{as_count, as_count_map, as_f64, as_f64_opt, as_non_empty_string, as_object};
use super::{top_level, DecodeError};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmeStats {
    pub total: u64,
    pub percentage: f64,
}

/// Corpus-wide aggregate counters from `/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_articles: u64,
    pub unique_domains: u64,
    pub date_range: DateRange,
    /// `(domain, article count)` in server order.
    pub top_domains: Vec<(String, u64)>,
    pub avg_word_count: f64,
    pub avg_news_score: Option<f64>,
    pub sme_related: Option<SmeStats>,
}

pub fn decode_stats(value: &Value) -> Result<Stats, DecodeError> {
    let root = top_level(value, Resource::Stats)?;

    let date_range = as_object(root.get("date_range"), "date_range")
        .map(|range| DateRange {
            earliest: as_non_empty_string(range.get("earliest")),
            latest: as_non_empty_string(range.get("latest")),
        })
        .unwrap_or_default();

    let sme_related = as_object(root.get("sme_related_stats"), "sme_related_stats").map(|sme| SmeStats {
        total: as_count(sme.get("total")),
        percentage: as_f64(sme.get("percentage")),
    });

    Ok(Stats {
        total_articles: as_count(root.get("total_articles")),
        unique_domains: as_count(root.get("unique_domains")),
        date_range,
        top_domains: as_count_map(root.get("top_domains"), "top_domains"),
        avg_word_count: as_f64(root.get("avg_word_count")),
        avg_news_score: as_f64_opt(root.get("avg_news_score")),
        sme_related,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_stats() {
        let stats = decode_stats(&json!({
            "total_articles": 1250,
            "unique_domains": "48",
            "date_range": { "earliest": "01/01/2024 - 09:00", "latest": null },
            "top_domains": { "www.bbc.co.uk": 120, "ft.com": 80 },
            "avg_word_count": 612.4,
            "sme_related_stats": { "total": 400, "percentage": 32.0 }
        }))
        .unwrap();

        assert_eq!(stats.total_articles, 1250);
        assert_eq!(stats.unique_domains, 48);
        assert_eq!(stats.date_range.earliest.as_deref(), Some("01/01/2024 - 09:00"));
        assert_eq!(stats.date_range.latest, None);
        assert_eq!(stats.top_domains[0], ("www.bbc.co.uk".to_string(), 120));
        assert_eq!(stats.avg_news_score, None);
        assert_eq!(stats.sme_related.unwrap().total, 400);
    }

    #[test]
    fn test_empty_object_decodes_to_zeroes() {
        let stats = decode_stats(&json!({})).unwrap();
        assert_eq!(stats.total_articles, 0);
        assert!(stats.top_domains.is_empty());
        assert!(stats.sme_related.is_none());
    }
}
