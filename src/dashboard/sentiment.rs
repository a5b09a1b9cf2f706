use serde::Serialize;

use super::{Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::model::decode_sentiment;
use crate::view::{
    sentiment_card, sentiment_distribution, sentiment_rows, DistributionSlice, SentimentCard, SentimentRow,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentView {
    pub overall: SentimentCard,
    pub sme_related: Option<SentimentCard>,
    pub distribution: Vec<DistributionSlice>,
    pub articles: Vec<SentimentRow>,
}

pub struct SentimentPage {
    dashboard: Dashboard,
    sentiment: QueryObserver,
}

impl SentimentPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            sentiment: dashboard.observer(),
        }
    }

    pub async fn load(&mut self) -> PageView<SentimentView> {
        self.dashboard
            .load(&mut self.sentiment, &ApiRequest::sentiment())
            .await;
        self.view()
    }

    pub async fn refresh(&mut self) -> PageView<SentimentView> {
        self.dashboard
            .reload(&mut self.sentiment, &ApiRequest::sentiment())
            .await;
        self.view()
    }

    pub fn view(&self) -> PageView<SentimentView> {
        PageView::from_state(self.sentiment.state(), decode_sentiment).map(|report| SentimentView {
            overall: sentiment_card(&report.overall),
            sme_related: report.sme_related.as_ref().map(sentiment_card),
            distribution: sentiment_distribution(&report.overall),
            articles: sentiment_rows(&report),
        })
    }
}
