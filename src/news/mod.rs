// src/news/mod.rs
pub mod tavily;
pub mod types;

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, error, info, warn};

use crate::config::NewsConfig;
use crate::news::tavily::TavilyProvider;
pub use crate::news::types::{NewsProvider, NewsRecord, RawSearchResult, SearchDepth};

/// Fixed search policy; not caller-configurable.
pub const NEWS_SEARCH_DEPTH: SearchDepth = SearchDepth::Advanced;
pub const NEWS_MAX_RESULTS: u32 = 5;

/// Latest-news lookup. Never fails: faults and a missing key both yield no records.
pub struct NewsLookup {
    provider: Option<Arc<dyn NewsProvider>>,
}

impl NewsLookup {
    pub fn from_config(cfg: &NewsConfig) -> Self {
        let Some(key) = cfg.api_key.as_deref() else {
            warn!("TAVILY_API_KEY not found; news lookup disabled");
            return Self::disabled();
        };
        match TavilyProvider::new(key, &cfg.base_url) {
            Ok(p) => {
                info!(base_url = %cfg.base_url, key_len = key.len(), "news backend ready");
                Self::with_provider(Arc::new(p))
            }
            Err(e) => {
                error!(error = ?e, "failed to build search client; news lookup disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Arc<dyn NewsProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn get_latest_news(&self, query: &str) -> Vec<NewsRecord> {
        let Some(provider) = &self.provider else {
            debug!("news lookup skipped: no provider");
            return Vec::new();
        };
        if query.trim().is_empty() {
            return Vec::new();
        }

        match provider
            .search(query, NEWS_SEARCH_DEPTH, NEWS_MAX_RESULTS)
            .await
        {
            Ok(results) => results.into_iter().map(NewsRecord::from).collect(),
            Err(e) => {
                warn!(error = ?e, provider = provider.name(), "error fetching news");
                counter!("news_lookup_errors_total").increment(1);
                Vec::new()
            }
        }
    }
}
