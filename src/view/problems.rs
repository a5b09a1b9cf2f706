use serde::Serialize;

use super::remainder_note;
use crate::model::{ArticleRef, ProblemReport};

pub const PROBLEM_ARTICLES_SHOWN: usize = 5;
pub const FALLBACK_PROBLEM_COLOR: &str = "#64748b";

/// Chart colour of a category, keyed by its display name in lower case.
pub fn problem_color(category: &str) -> &'static str {
    match category.replace('_', " ").to_lowercase().as_str() {
        "financing" => "#3b82f6",
        "workforce" => "#10b981",
        "regulation" => "#f59e0b",
        "technology" => "#8b5cf6",
        "market competition" => "#ef4444",
        "supply chain" => "#06b6d4",
        "sustainability" => "#84cc16",
        "innovation" => "#f97316",
        _ => FALLBACK_PROBLEM_COLOR,
    }
}

/// `market_competition` -> `Market competition`.
pub fn problem_label(category: &str) -> String {
    let spaced = category.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Share of problem-tagged articles that are SME related, as a whole percentage.
pub fn coverage_percentage(sme_with_problems: u64, total_with_problems: u64) -> u64 {
    if total_with_problems == 0 {
        return 0;
    }
    (sme_with_problems as f64 / total_with_problems as f64 * 100.0).round() as u64
}

/// Paired bar: all articles vs SME-related articles for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemBar {
    pub category: String,
    pub label: String,
    pub all_articles: u64,
    pub sme_related: u64,
    pub color: &'static str,
}

pub fn problem_distribution(report: &ProblemReport) -> Vec<ProblemBar> {
    report
        .all_articles
        .iter()
        .map(|(category, count)| ProblemBar {
            category: category.clone(),
            label: problem_label(category),
            all_articles: *count,
            sme_related: report.sme_count(category),
            color: problem_color(category),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemArticleList {
    pub label: String,
    pub total: usize,
    pub articles: Vec<ArticleRef>,
    pub more: Option<String>,
}

pub fn problem_article_lists(report: &ProblemReport) -> Vec<ProblemArticleList> {
    report
        .problem_articles
        .iter()
        .map(|entry| ProblemArticleList {
            label: problem_label(&entry.category),
            total: entry.articles.len(),
            articles: entry.articles.iter().take(PROBLEM_ARTICLES_SHOWN).cloned().collect(),
            more: remainder_note(entry.articles.len(), PROBLEM_ARTICLES_SHOWN),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemTotals {
    pub total_articles_with_problems: u64,
    pub sme_articles_with_problems: u64,
    pub coverage_percentage: u64,
}

pub fn problem_totals(report: &ProblemReport) -> ProblemTotals {
    ProblemTotals {
        total_articles_with_problems: report.total_articles_with_problems,
        sme_articles_with_problems: report.sme_articles_with_problems,
        coverage_percentage: coverage_percentage(
            report.sme_articles_with_problems,
            report.total_articles_with_problems,
        ),
    }
}
