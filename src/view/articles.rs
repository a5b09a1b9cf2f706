use serde::Serialize;

use super::dates::format_publish_date;
use super::problems::problem_label;
use super::sentiment::SentimentLabel;
use super::truncate_chars;
use crate::model::{Article, ArticleAnalysis, Availability, Pagination, SentimentScores};

pub const EXCERPT_CHARS: usize = 200;
pub const BASIC_SENTIMENT_NOTE: &str =
    "Deep analysis is not available for this article; showing basic sentiment";

/// Whether a search query is long enough to be sent. Counts characters, not bytes,
/// and does not trim.
pub fn search_enabled(query: &str, min_chars: usize) -> bool {
    query.chars().count() >= min_chars
}

pub fn previous_page(page: u32) -> u32 {
    page.saturating_sub(1).max(1)
}

pub fn next_page(page: u32, pages: u64) -> u32 {
    if u64::from(page) < pages {
        page.saturating_add(1)
    } else {
        page
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub page: u32,
    pub pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub label: String,
}

/// Controls for the page the user asked for. The server's page number is not trusted
/// over the requested one.
pub fn pagination_controls(page: u32, pagination: &Pagination) -> PaginationControls {
    let page = page.max(1);
    PaginationControls {
        page,
        pages: pagination.pages,
        has_previous: page > 1,
        has_next: u64::from(page) < pagination.pages,
        label: format!("Page {} of {}", page, pagination.pages),
    }
}

pub fn excerpt(content: &str) -> String {
    truncate_chars(content.trim(), EXCERPT_CHARS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBadge {
    pub label: SentimentLabel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub excerpt: String,
    pub score: Option<ScoreBadge>,
    pub date: Option<String>,
    pub word_count: u64,
    pub is_sme_related: bool,
}

pub fn article_card(article: &Article) -> ArticleCard {
    ArticleCard {
        id: article.id.clone(),
        title: article.title.clone(),
        url: article.url.clone(),
        domain: article.domain.clone(),
        excerpt: excerpt(&article.content),
        score: article.news_score.map(|score| ScoreBadge {
            label: SentimentLabel::from_score(score),
            text: format!("Score: {:.2}", score),
        }),
        date: format_publish_date(article.publish_date.as_deref()),
        word_count: article.word_count,
        is_sme_related: article.is_sme_related,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDetail {
    pub label: SentimentLabel,
    pub compound: String,
    pub positive: String,
    pub neutral: String,
    pub negative: String,
}

pub fn sentiment_detail(scores: &SentimentScores) -> SentimentDetail {
    SentimentDetail {
        label: SentimentLabel::from_score(scores.compound),
        compound: format!("{:.3}", scores.compound),
        positive: format!("{:.1}%", scores.pos * 100.0),
        neutral: format!("{:.1}%", scores.neu * 100.0),
        negative: format!("{:.1}%", scores.neg * 100.0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRow {
    pub entity: String,
    pub score: String,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepAnalysisView {
    pub summary: Option<String>,
    pub overall: Option<SentimentLabel>,
    pub entities: Vec<EntityRow>,
    pub tones: Vec<(String, String)>,
    pub sme_implications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnalysisSection {
    Deep(DeepAnalysisView),
    /// Shown when deep analysis has not been computed. Never rendered as an error.
    Basic {
        note: &'static str,
        sentiment: Option<SentimentDetail>,
    },
}

pub fn analysis_section(article: &Article, analysis: &Availability<ArticleAnalysis>) -> AnalysisSection {
    match analysis {
        Availability::Available(analysis) => AnalysisSection::Deep(DeepAnalysisView {
            summary: analysis.summary.clone(),
            overall: analysis.overall_sentiment.map(SentimentLabel::from_score),
            entities: analysis
                .entity_sentiment
                .iter()
                .map(|e| EntityRow {
                    entity: e.entity.clone(),
                    score: format!("{:.3}", e.score),
                    label: SentimentLabel::from_score(e.score),
                })
                .collect(),
            tones: analysis
                .emotional_tone
                .iter()
                .map(|(tone, intensity)| (tone.clone(), format!("{:.2}", intensity)))
                .collect(),
            sme_implications: analysis.sme_implications.clone(),
        }),
        Availability::Unavailable => AnalysisSection::Basic {
            note: BASIC_SENTIMENT_NOTE,
            sentiment: article.sentiment.as_ref().map(sentiment_detail),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDetailView {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub date: Option<String>,
    pub word_count: u64,
    pub is_sme_related: bool,
    pub content: String,
    pub sentiment: Option<SentimentDetail>,
    pub problems: Vec<String>,
    pub news_score: String,
    pub analysis: AnalysisSection,
}

pub fn article_detail(article: &Article, analysis: &Availability<ArticleAnalysis>) -> ArticleDetailView {
    ArticleDetailView {
        id: article.id.clone(),
        title: article.title.clone(),
        url: article.url.clone(),
        domain: article.domain.clone(),
        date: format_publish_date(article.publish_date.as_deref()),
        word_count: article.word_count,
        is_sme_related: article.is_sme_related,
        content: article.content.clone(),
        sentiment: article.sentiment.as_ref().map(sentiment_detail),
        problems: article.problems.iter().map(|p| problem_label(p)).collect(),
        news_score: article
            .news_score
            .map(|score| format!("{:.2}", score))
            .unwrap_or_else(|| "N/A".to_string()),
        analysis: analysis_section(article, analysis),
    }
}
