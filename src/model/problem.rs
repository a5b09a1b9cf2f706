use serde::Serialize;
use serde_json::Value;

use super::article::{decode_article_refs, ArticleRef};
use super::coerce::{as_count, as_count_map};
use super::{required_section, top_level, DecodeError};
use crate::api::Resource;

/// Articles tagged with one SME problem category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemArticles {
    pub category: String,
    pub articles: Vec<ArticleRef>,
}

/// `/problems` payload. Category order follows the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemReport {
    /// `(category, count)` over all articles.
    pub all_articles: Vec<(String, u64)>,
    /// `(category, count)` over SME-related articles. Categories may be missing.
    pub sme_related: Vec<(String, u64)>,
    pub problem_articles: Vec<ProblemArticles>,
    pub total_articles_with_problems: u64,
    pub sme_articles_with_problems: u64,
}

impl ProblemReport {
    /// SME count for `category`, zero when the server omitted it.
    pub fn sme_count(&self, category: &str) -> u64 {
        self.sme_related
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

pub fn decode_problems(value: &Value) -> Result<ProblemReport, DecodeError> {
    let root = top_level(value, Resource::Problems)?;
    let summary = required_section(root, "problem_summary", Resource::Problems)?;
    let articles = required_section(root, "problem_articles", Resource::Problems)?;

    let problem_articles = articles
        .iter()
        .map(|(category, list)| ProblemArticles {
            category: category.clone(),
            articles: decode_article_refs(Some(list), &format!("problem {}", category)),
        })
        .collect();

    Ok(ProblemReport {
        all_articles: as_count_map(summary.get("all_articles"), "problem_summary.all_articles"),
        sme_related: as_count_map(summary.get("sme_related"), "problem_summary.sme_related"),
        problem_articles,
        total_articles_with_problems: as_count(root.get("total_articles_with_problems")),
        sme_articles_with_problems: as_count(root.get("sme_articles_with_problems")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_category_list_is_empty() {
        let report = decode_problems(&json!({
            "problem_summary": {
                "all_articles": { "financing": 12, "workforce": 5 },
                "sme_related": { "financing": 7 }
            },
            "problem_articles": {
                "financing": "not-an-array",
                "workforce": [{ "article_id": "w1", "title": "Hiring freeze", "url": "https://x/w1" }]
            },
            "total_articles_with_problems": 17,
            "sme_articles_with_problems": 7
        }))
        .unwrap();

        assert!(report.problem_articles[0].articles.is_empty());
        assert_eq!(report.problem_articles[1].articles[0].title, "Hiring freeze");
        assert_eq!(report.sme_count("financing"), 7);
        assert_eq!(report.sme_count("workforce"), 0);
        assert_eq!(report.total_articles_with_problems, 17);
    }

    #[test]
    fn test_summary_sections_required() {
        let err = decode_problems(&json!({ "problem_summary": "x", "problem_articles": {} })).unwrap_err();
        assert!(err.reason.contains("problem_summary"));
        let err = decode_problems(&json!({ "problem_summary": {} })).unwrap_err();
        assert!(err.reason.contains("problem_articles"));
    }
}
