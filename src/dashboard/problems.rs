use serde::Serialize;

use super::{Dashboard, PageView};
use crate::api::ApiRequest;
use crate::cache::QueryObserver;
use crate::model::decode_problems;
use crate::view::{
    problem_article_lists, problem_distribution, problem_totals, ProblemArticleList, ProblemBar, ProblemTotals,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemsView {
    pub bars: Vec<ProblemBar>,
    pub lists: Vec<ProblemArticleList>,
    pub totals: ProblemTotals,
}

pub struct ProblemsPage {
    dashboard: Dashboard,
    problems: QueryObserver,
}

impl ProblemsPage {
    pub fn new(dashboard: &Dashboard) -> Self {
        Self {
            dashboard: dashboard.clone(),
            problems: dashboard.observer(),
        }
    }

    pub async fn load(&mut self) -> PageView<ProblemsView> {
        self.dashboard
            .load(&mut self.problems, &ApiRequest::problems())
            .await;
        self.view()
    }

    pub async fn refresh(&mut self) -> PageView<ProblemsView> {
        self.dashboard
            .reload(&mut self.problems, &ApiRequest::problems())
            .await;
        self.view()
    }

    pub fn view(&self) -> PageView<ProblemsView> {
        PageView::from_state(self.problems.state(), decode_problems).map(|report| ProblemsView {
            bars: problem_distribution(&report),
            lists: problem_article_lists(&report),
            totals: problem_totals(&report),
        })
    }
}
