use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::api::DEFAULT_REQUEST_TIMEOUT;
use crate::environment::{get_env_var, get_env_var_as_vec, get_env_var_parsed};

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_PER_PAGE: u32 = 20;
/// Search only runs once the query is at least this many characters long.
pub const DEFAULT_SEARCH_MIN_CHARS: usize = 3;
pub const DEFAULT_CLUSTER_CHOICES: [u32; 5] = [4, 6, 8, 10, 12];
pub const DEFAULT_CLUSTER_COUNT: u32 = 8;

/// Runtime settings for a dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub per_page: u32,
    pub search_min_chars: usize,
    pub cluster_choices: Vec<u32>,
    pub request_timeout: Duration,
    /// `None` means a cached entry stays fresh until invalidated or refetched.
    pub stale_time: Option<Duration>,
    pub gc_time: Duration,
    pub log_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            search_min_chars: DEFAULT_SEARCH_MIN_CHARS,
            cluster_choices: DEFAULT_CLUSTER_CHOICES.to_vec(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            stale_time: None,
            gc_time: Duration::from_secs(300),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl DashboardConfig {
    /// Builds a configuration from `SMEDASH_*` environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = get_env_var("SMEDASH_API_URL").unwrap_or(defaults.api_url);

        let mut per_page = get_env_var_parsed("SMEDASH_PER_PAGE", defaults.per_page);
        if per_page == 0 {
            warn!("SMEDASH_PER_PAGE must be positive, using {}", DEFAULT_PER_PAGE);
            per_page = DEFAULT_PER_PAGE;
        }

        let mut cluster_choices: Vec<u32> = get_env_var_as_vec("SMEDASH_CLUSTER_CHOICES", ';')
            .iter()
            .filter_map(|s| s.parse::<u32>().ok())
            .filter(|&k| k > 0)
            .collect();
        if cluster_choices.is_empty() {
            cluster_choices = defaults.cluster_choices;
        }

        let stale_secs: u64 = get_env_var_parsed("SMEDASH_STALE_SECS", 0);

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            per_page,
            search_min_chars: get_env_var_parsed(
                "SMEDASH_SEARCH_MIN_CHARS",
                defaults.search_min_chars,
            ),
            cluster_choices,
            request_timeout: Duration::from_secs(get_env_var_parsed(
                "SMEDASH_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            stale_time: (stale_secs > 0).then(|| Duration::from_secs(stale_secs)),
            gc_time: Duration::from_secs(get_env_var_parsed(
                "SMEDASH_GC_SECS",
                defaults.gc_time.as_secs(),
            )),
            log_dir: get_env_var("SMEDASH_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        if per_page > 0 {
            self.per_page = per_page;
        }
        self
    }

    pub fn is_allowed_cluster_count(&self, k: u32) -> bool {
        self.cluster_choices.contains(&k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_url, "http://localhost:5001");
        assert_eq!(config.per_page, 20);
        assert_eq!(config.search_min_chars, 3);
        assert!(config.stale_time.is_none());
        assert!(config.is_allowed_cluster_count(8));
        assert!(!config.is_allowed_cluster_count(7));
    }

    #[test]
    fn test_overrides_trim_and_reject_zero() {
        let config = DashboardConfig::default()
            .with_api_url("http://example.test:9000/")
            .with_per_page(0);
        assert_eq!(config.api_url, "http://example.test:9000");
        assert_eq!(config.per_page, 20);
    }
}
