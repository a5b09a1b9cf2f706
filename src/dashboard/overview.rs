use serde::Serialize;
use tracing::warn;

use super::{Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::model::{decode_sentiment, decode_stats};
use crate::view::{
    news_quality, rank_domains, sentiment_card, sentiment_distribution, stat_cards, DistributionSlice,
    DomainCount, SentimentCard, StatCard,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub cards: Vec<StatCard>,
    pub news_quality: String,
    pub top_domains: Vec<DomainCount>,
    /// Missing when the sentiment request failed or is still loading.
    pub sentiment: Option<SentimentCard>,
    pub distribution: Vec<DistributionSlice>,
}

pub struct OverviewPage {
    dashboard: Dashboard,
    stats: QueryObserver,
    sentiment: QueryObserver,
}

impl OverviewPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            stats: dashboard.observer(),
            sentiment: dashboard.observer(),
        }
    }

    /// Stats and sentiment load concurrently and fail independently.
    pub async fn load(&mut self) -> PageView<OverviewView> {
        let (stats, sentiment) = (ApiRequest::stats(), ApiRequest::sentiment());
        tokio::join!(
            self.dashboard.load(&mut self.stats, &stats),
            self.dashboard.load(&mut self.sentiment, &sentiment),
        );
        self.view()
    }

    pub async fn refresh(&mut self) -> PageView<OverviewView> {
        let (stats, sentiment) = (ApiRequest::stats(), ApiRequest::sentiment());
        tokio::join!(
            self.dashboard.reload(&mut self.stats, &stats),
            self.dashboard.reload(&mut self.sentiment, &sentiment),
        );
        self.view()
    }

    pub fn view(&self) -> PageView<OverviewView> {
        let sentiment = match PageView::from_state(self.sentiment.state(), decode_sentiment) {
            PageView::Failed(err) => {
                warn!("Overview shown without sentiment: {}", err);
                None
            }
            view => view.into_data(),
        };

        PageView::from_state(self.stats.state(), decode_stats).map(|stats| OverviewView {
            cards: stat_cards(&stats),
            news_quality: news_quality(&stats),
            top_domains: rank_domains(&stats.top_domains),
            sentiment: sentiment.as_ref().map(|report| sentiment_card(&report.overall)),
            distribution: sentiment
                .as_ref()
                .map(|report| sentiment_distribution(&report.overall))
                .unwrap_or_default(),
        })
    }
}
