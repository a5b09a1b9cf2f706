use serde::Serialize;

use super::{Dashboard, PageView};
use crate::api::{ApiRequest, ArticleFilter};
use crate::cache::QueryObserver;
use crate::model::{decode_article_page, decode_search_results, decode_stats};
use crate::view::{
    article_card, next_page, pagination_controls, previous_page, search_enabled, ArticleCard,
    PaginationControls,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlesView {
    pub query: String,
    /// True when the list below is a search result rather than a page of the listing.
    pub searching: bool,
    pub articles: Vec<ArticleCard>,
    /// Only shown while the search box is empty.
    pub pagination: Option<PaginationControls>,
    /// Domain filter options: the corpus stats keys as the server knows them.
    pub domains: Vec<String>,
}

/// Browse, filter and search articles.
pub struct ArticlesPage {
    dashboard: Dashboard,
    page: u32,
    filter: ArticleFilter,
    query: String,
    listing: QueryObserver,
    search: QueryObserver,
    stats: QueryObserver,
}

impl ArticlesPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            page: 1,
            filter: ArticleFilter::default(),
            query: String::new(),
            listing: dashboard.observer(),
            search: dashboard.observer(),
            stats: dashboard.observer(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filter(&self) -> &ArticleFilter {
        &self.filter
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        let pages = PageView::from_state(self.listing.state(), decode_article_page)
            .into_data()
            .and_then(|listing| listing.pagination)
            .map(|pagination| pagination.pages)
            .unwrap_or(0);
        self.page = next_page(self.page, pages);
    }

    pub fn previous_page(&mut self) {
        self.page = previous_page(self.page);
    }

    /// A new filter starts over from the first page.
    pub fn set_filter(&mut self, filter: ArticleFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn is_searching(&self) -> bool {
        search_enabled(&self.query, self.dashboard.config().search_min_chars)
    }

    fn listing_request(&self) -> ApiRequest {
        ApiRequest::articles(self.page, self.dashboard.config().per_page, &self.filter)
    }

    /// Issue whatever the current parameters need. Search only runs once the query
    /// passes the length gate; below it the search query is idle and never sent.
    pub async fn load(&mut self) -> PageView<ArticlesView> {
        let listing = self.listing_request();
        let stats = ApiRequest::stats();

        if self.is_searching() {
            let search = ApiRequest::search(&self.query, self.filter.is_sme_related);
            tokio::join!(
                self.dashboard.load(&mut self.listing, &listing),
                self.dashboard.load(&mut self.search, &search),
                self.dashboard.load(&mut self.stats, &stats),
            );
        } else {
            self.search.disable();
            tokio::join!(
                self.dashboard.load(&mut self.listing, &listing),
                self.dashboard.load(&mut self.stats, &stats),
            );
        }
        self.view()
    }

    pub fn view(&self) -> PageView<ArticlesView> {
        let domains = PageView::from_state(self.stats.state(), decode_stats)
            .into_data()
            .map(|stats| {
                stats
                    .top_domains
                    .iter()
                    .map(|(domain, _)| domain.clone())
                    .collect()
            })
            .unwrap_or_default();

        if self.is_searching() {
            return PageView::from_state(self.search.state(), decode_search_results).map(|articles| {
                ArticlesView {
                    query: self.query.clone(),
                    searching: true,
                    articles: articles.iter().map(article_card).collect(),
                    pagination: None,
                    domains,
                }
            });
        }

        let show_pagination = self.query.is_empty();
        PageView::from_state(self.listing.state(), decode_article_page).map(|listing| ArticlesView {
            query: self.query.clone(),
            searching: false,
            articles: listing.articles.iter().map(article_card).collect(),
            pagination: listing
                .pagination
                .filter(|_| show_pagination)
                .map(|pagination| pagination_controls(self.page, &pagination)),
            domains,
        })
    }
}
