pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod environment;
pub mod logging;
pub mod model;
pub mod view;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_CACHE: &str = "query_cache";

pub use api::{ApiClient, ArticleFilter, FetchError, Resource};
pub use cache::{QueryCache, QueryKey, QueryObserver, QueryState};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PageView};
pub use model::{Availability, DecodeError};
