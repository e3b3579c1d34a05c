// src/config/search.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const ENV_PAPERS_DIR: &str = "PAPERS_DIR";

fn default_news_base_url() -> String {
    "https://api.tavily.com".to_string()
}

/// Web-search provider settings (`[news]` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Missing or "ENV" means: read from TAVILY_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
        }
    }
}

impl NewsConfig {
    pub fn resolve(mut self) -> Self {
        self.api_key = super::resolve_secret(self.api_key.take(), ENV_TAVILY_API_KEY);
        self
    }
}

/// Document store settings (`[papers]` table).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PapersConfig {
    /// Directory holding uploaded papers. Falls back to $PAPERS_DIR.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl PapersConfig {
    pub fn resolve(mut self) -> Self {
        if self.dir.is_none() {
            self.dir = std::env::var(ENV_PAPERS_DIR)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
        self
    }
}
