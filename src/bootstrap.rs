// src/bootstrap.rs
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::generate::{ImageAnalyzer, ResponseGenerator};
use crate::news::NewsLookup;
use crate::search::{DocumentStore, KeywordFinder, PaperDirectory};

/// All four components, built once from config and shared read-only.
#[derive(Clone)]
pub struct Services {
    pub generator: Arc<ResponseGenerator>,
    pub images: Arc<ImageAnalyzer>,
    pub news: Arc<NewsLookup>,
    pub finder: Arc<KeywordFinder>,
}

impl Services {
    pub fn from_config(cfg: &AppConfig) -> Self {
        // Safe diagnostics: only which backends are live + key lengths
        info!(
            "relay cfg loaded: llm_key_len={}, news_key_len={}, text_model={}, vision_model={}, persona={}, papers_dir={:?}",
            cfg.llm.key_len(),
            cfg.news.api_key.as_deref().map(str::len).unwrap_or(0),
            cfg.llm.text_model,
            cfg.llm.vision_model,
            cfg.llm.persona.is_some(),
            cfg.papers.dir
        );

        let store = cfg
            .papers
            .dir
            .as_ref()
            .map(|d| Arc::new(PaperDirectory::new(d)) as Arc<dyn DocumentStore>);

        Self {
            generator: Arc::new(ResponseGenerator::from_config(&cfg.llm)),
            images: Arc::new(ImageAnalyzer::from_config(&cfg.llm)),
            news: Arc::new(NewsLookup::from_config(&cfg.news)),
            finder: Arc::new(KeywordFinder::new(store)),
        }
    }

    /// Every component in its disabled / empty state.
    pub fn disabled() -> Self {
        Self {
            generator: Arc::new(ResponseGenerator::disabled()),
            images: Arc::new(ImageAnalyzer::disabled()),
            news: Arc::new(NewsLookup::disabled()),
            finder: Arc::new(KeywordFinder::default()),
        }
    }
}
