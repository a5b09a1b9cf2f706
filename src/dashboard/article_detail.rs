use super::{availability, Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::model::{decode_article_analysis, decode_article_detail};
use crate::view::{article_detail, ArticleDetailView};

/// One article with its optional deep analysis.
pub struct ArticleDetailPage {
    dashboard: Dashboard,
    id: String,
    article: QueryObserver,
    analysis: QueryObserver,
}

impl ArticleDetailPage {
    pub fn new(dashboard: &Dashboard, id: &str) -> Self {
        Self {
            dashboard: dashboard.clone(),
            id: id.to_string(),
            article: dashboard.observer(),
            analysis: dashboard.observer(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// An empty id disables both queries.
    pub async fn load(&mut self) -> PageView<ArticleDetailView> {
        if self.id.trim().is_empty() {
            self.article.disable();
            self.analysis.disable();
            return self.view();
        }
        let (article, analysis) = (ApiRequest::article(&self.id), ApiRequest::analysis(&self.id));
        tokio::join!(
            self.dashboard.load(&mut self.article, &article),
            self.dashboard.load(&mut self.analysis, &analysis),
        );
        self.view()
    }

    pub fn view(&self) -> PageView<ArticleDetailView> {
        let analysis = availability(self.analysis.state(), decode_article_analysis);
        PageView::from_state(self.article.state(), decode_article_detail)
            .map(|article| article_detail(&article, &analysis))
    }
}
