use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::coerce::{
    as_bool, as_count, as_f64, as_f64_opt, as_list, as_non_empty_string, as_object, as_string,
    as_string_list,
};
use super::{top_level, DecodeError};
use crate::api::Resource;

/// Per-text sentiment scores as produced by the analytics service.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentScores {
    pub compound: f64,
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
}

impl SentimentScores {
    pub fn decode(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            compound: as_f64(map.get("compound")),
            pos: as_f64(map.get("pos")),
            neu: as_f64(map.get("neu")),
            neg: as_f64(map.get("neg")),
        })
    }
}

/// One ingested news item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub domain: String,
    /// Raw `DD/MM/YYYY - HH:MM` text as sent by the server.
    pub publish_date: Option<String>,
    pub word_count: u64,
    pub is_sme_related: bool,
    pub news_score: Option<f64>,
    pub sentiment: Option<SentimentScores>,
    pub problems: Vec<String>,
}

/// Lightweight article reference used inside clusters and problem lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRef {
    pub article_id: String,
    pub title: String,
    pub url: Option<String>,
}

/// Pagination metadata of an article listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub pagination: Option<Pagination>,
}

fn article_id(value: &Value) -> Option<String> {
    ["_id", "id", "article_id"]
        .iter()
        .find_map(|field| as_non_empty_string(value.get(*field)))
}

/// Decode one article. Returns `None` when `value` is not an object.
pub fn decode_article(value: &Value) -> Option<Article> {
    let map = value.as_object()?;
    Some(Article {
        id: article_id(value).unwrap_or_default(),
        url: as_string(map.get("url")).unwrap_or_default(),
        title: as_non_empty_string(map.get("title")).unwrap_or_else(|| "Untitled".to_string()),
        content: as_string(map.get("content")).unwrap_or_default(),
        domain: as_string(map.get("domain")).unwrap_or_default(),
        publish_date: as_non_empty_string(map.get("publish_date")),
        word_count: as_count(map.get("word_count")),
        is_sme_related: as_bool(map.get("is_sme_related")),
        news_score: as_f64_opt(map.get("news_score")),
        sentiment: map.get("sentiment").and_then(SentimentScores::decode),
        problems: as_string_list(map.get("problems"), "article problems"),
    })
}

/// Decode a list of articles, dropping entries that are not objects.
pub fn decode_article_list(value: Option<&Value>, context: &str) -> Vec<Article> {
    as_list(value, context)
        .iter()
        .filter_map(|item| {
            let article = decode_article(item);
            if article.is_none() {
                warn!("Skipping invalid article entry in {}", context);
            }
            article
        })
        .collect()
}

/// Decode a list of article references, dropping entries that are not objects.
pub fn decode_article_refs(value: Option<&Value>, context: &str) -> Vec<ArticleRef> {
    as_list(value, context)
        .iter()
        .filter_map(|item| {
            if !item.is_object() {
                warn!("Skipping invalid article reference in {}", context);
                return None;
            }
            Some(ArticleRef {
                article_id: article_id(item).unwrap_or_default(),
                title: as_non_empty_string(item.get("title"))
                    .unwrap_or_else(|| "Untitled".to_string()),
                url: as_non_empty_string(item.get("url")),
            })
        })
        .collect()
}

fn decode_pagination(value: Option<&Value>) -> Option<Pagination> {
    let map = as_object(value, "pagination")?;
    Some(Pagination {
        page: as_count(map.get("page")).max(1),
        per_page: as_count(map.get("per_page")),
        total: as_count(map.get("total")),
        pages: as_count(map.get("pages")),
    })
}

/// `/articles` payload.
pub fn decode_article_page(value: &Value) -> Result<ArticlePage, DecodeError> {
    let root = top_level(value, Resource::Articles)?;
    Ok(ArticlePage {
        articles: decode_article_list(root.get("articles"), "articles"),
        pagination: decode_pagination(root.get("pagination")),
    })
}

/// `/search` payload.
pub fn decode_search_results(value: &Value) -> Result<Vec<Article>, DecodeError> {
    let root = top_level(value, Resource::Search)?;
    Ok(decode_article_list(root.get("articles"), "search results"))
}

/// `/article/{id}` payload.
pub fn decode_article_detail(value: &Value) -> Result<Article, DecodeError> {
    top_level(value, Resource::Article)?;
    decode_article(value).ok_or_else(|| DecodeError::new(Resource::Article, "not an article"))
}
