//! Keyword search: a linear, case-insensitive substring scan over the document store.
//! No index, no ranking.

pub mod store;

use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use store::{DocumentStore, PaperDirectory};

pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Characters kept before the match start.
pub const SNIPPET_BEFORE: usize = 100;
/// Characters kept after the match *start* (not the match end).
pub const SNIPPET_AFTER: usize = 400;
pub const SNIPPET_SUFFIX: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "source")]
    pub source_id: String,
    #[serde(rename = "content")]
    pub snippet: String,
    pub score: f64,
}

#[derive(Clone, Default)]
pub struct KeywordFinder {
    store: Option<Arc<dyn DocumentStore>>,
}

impl KeywordFinder {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self { store: Some(store) }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// At most one hit per document; documents after the `max_results`-th hit are never read.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        if query.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for id in store.list_documents() {
            let path = store.document_path(&id);
            let Some(content) = store.extract_text(&path) else {
                debug!(document = %id, "no text extracted; skipping");
                continue;
            };
            if let Some(snippet) = snippet_around(&content, query) {
                hits.push(SearchHit {
                    source_id: id,
                    snippet,
                    score: 1.0,
                });
                if hits.len() >= max_results {
                    break;
                }
            }
        }

        counter!("keyword_search_hits_total").increment(hits.len() as u64);
        hits
    }
}

/// Excerpt around the first case-insensitive occurrence of `query`:
/// `[start - 100, start + 400)` characters, clamped, trimmed, with "..." appended.
pub fn snippet_around(content: &str, query: &str) -> Option<String> {
    let haystack = content.to_lowercase();
    let needle = query.to_lowercase();
    let byte_idx = haystack.find(&needle)?;
    let idx = haystack[..byte_idx].chars().count();

    let chars: Vec<char> = content.chars().collect();
    let end = (idx + SNIPPET_AFTER).min(chars.len());
    let start = idx.saturating_sub(SNIPPET_BEFORE).min(end);
    let excerpt: String = chars[start..end].iter().collect();
    Some(format!("{}{SNIPPET_SUFFIX}", excerpt.trim()))
}
