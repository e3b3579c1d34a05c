// src/news/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// How hard the provider should search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

/// One result record as the provider returns it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Normalized news item, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "score")]
    pub relevance_score: Option<f64>,
}

impl From<RawSearchResult> for NewsRecord {
    fn from(r: RawSearchResult) -> Self {
        Self {
            title: r.title,
            url: r.url,
            content: r.content,
            relevance_score: r.score,
        }
    }
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: u32,
    ) -> Result<Vec<RawSearchResult>>;
    fn name(&self) -> &'static str;
}
