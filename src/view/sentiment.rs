use serde::Serialize;
use std::fmt;

use crate::model::{SentimentReport, SentimentScores, SentimentSummary};

/// Scores strictly above this are positive, strictly below its negation negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// The one bucketing rule used for article, corpus and entity sentiment alike.
    /// The thresholds themselves are neutral, as is NaN.
    pub fn from_score(score: f64) -> Self {
        if score > SENTIMENT_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -SENTIMENT_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "#10b981",
            SentimentLabel::Negative => "#ef4444",
            SentimentLabel::Neutral => "#64748b",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One slice of the sentiment pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub label: SentimentLabel,
    pub count: u64,
    pub color: &'static str,
}

pub fn sentiment_distribution(summary: &SentimentSummary) -> Vec<DistributionSlice> {
    [
        (SentimentLabel::Positive, summary.positive_articles),
        (SentimentLabel::Negative, summary.negative_articles),
        (SentimentLabel::Neutral, summary.neutral_articles),
    ]
    .into_iter()
    .map(|(label, count)| DistributionSlice {
        label,
        count,
        color: label.color(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentCard {
    pub mean_compound: String,
    pub label: SentimentLabel,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub total: u64,
}

pub fn sentiment_card(summary: &SentimentSummary) -> SentimentCard {
    SentimentCard {
        mean_compound: format!("{:.3}", summary.mean_compound),
        label: SentimentLabel::from_score(summary.mean_compound),
        positive: summary.positive_articles,
        negative: summary.negative_articles,
        neutral: summary.neutral_articles,
        total: summary.total(),
    }
}

/// Per-article line of the sentiment page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRow {
    pub article_id: String,
    pub title: String,
    pub is_sme_related: bool,
    pub label: SentimentLabel,
    pub compound: String,
    pub pos: String,
    pub neu: String,
    pub neg: String,
}

pub fn sentiment_row(article_id: &str, title: &str, is_sme_related: bool, scores: &SentimentScores) -> SentimentRow {
    SentimentRow {
        article_id: article_id.to_string(),
        title: title.to_string(),
        is_sme_related,
        label: SentimentLabel::from_score(scores.compound),
        compound: format!("{:.3}", scores.compound),
        pos: format!("{:.3}", scores.pos),
        neu: format!("{:.3}", scores.neu),
        neg: format!("{:.3}", scores.neg),
    }
}

pub fn sentiment_rows(report: &SentimentReport) -> Vec<SentimentRow> {
    report
        .articles
        .iter()
        .map(|a| sentiment_row(&a.article_id, &a.title, a.is_sme_related, &a.scores))
        .collect()
}
