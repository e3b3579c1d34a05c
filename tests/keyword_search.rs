// tests/keyword_search.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use research_relay::search::{
    DocumentStore, KeywordFinder, PaperDirectory, SearchHit, DEFAULT_MAX_RESULTS,
};

/// In-memory store that records every collaborator call.
struct TrackingStore {
    docs: Vec<(String, Option<String>)>,
    listed: Mutex<usize>,
    read: Mutex<Vec<String>>,
}

impl TrackingStore {
    fn new(docs: &[(&str, Option<&str>)]) -> Arc<Self> {
        Arc::new(Self {
            docs: docs
                .iter()
                .map(|(id, text)| (id.to_string(), text.map(str::to_string)))
                .collect(),
            listed: Mutex::new(0),
            read: Mutex::new(Vec::new()),
        })
    }

    fn read_ids(&self) -> Vec<String> {
        self.read.lock().unwrap().clone()
    }
}

impl DocumentStore for TrackingStore {
    fn list_documents(&self) -> Vec<String> {
        *self.listed.lock().unwrap() += 1;
        self.docs.iter().map(|(id, _)| id.clone()).collect()
    }

    fn document_path(&self, id: &str) -> PathBuf {
        PathBuf::from("/papers").join(id)
    }

    fn extract_text(&self, path: &Path) -> Option<String> {
        let id = path.file_name()?.to_str()?.to_string();
        self.read.lock().unwrap().push(id.clone());
        self.docs
            .iter()
            .find(|(d, _)| *d == id)
            .and_then(|(_, t)| t.clone())
    }
}

#[test]
fn stops_after_max_results_and_never_reads_later_documents() {
    let store = TrackingStore::new(&[
        ("one.pdf", Some("The sky is Blue today.")),
        ("two.pdf", Some("BLUE whales are large.")),
        ("three.pdf", Some("Another blue thing.")),
    ]);
    let finder = KeywordFinder::with_store(store.clone());

    let hits = finder.search("blue", 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source_id, "one.pdf");
    assert_eq!(hits[1].source_id, "two.pdf");
    for h in &hits {
        assert_eq!(h.score, 1.0);
        assert!(h.snippet.ends_with("..."));
    }
    assert_eq!(store.read_ids(), vec!["one.pdf", "two.pdf"]);
}

#[test]
fn empty_query_never_touches_the_store() {
    let store = TrackingStore::new(&[("one.pdf", Some("x"))]);
    let finder = KeywordFinder::with_store(store.clone());

    assert!(finder.search("", DEFAULT_MAX_RESULTS).is_empty());
    assert_eq!(*store.listed.lock().unwrap(), 0);
    assert!(store.read_ids().is_empty());
}

#[test]
fn zero_max_results_returns_nothing_without_listing() {
    let store = TrackingStore::new(&[("a.pdf", Some("blue sky")), ("b.pdf", Some("blue sea"))]);
    let finder = KeywordFinder::with_store(store.clone());

    assert!(finder.search("blue", 0).is_empty());
    assert_eq!(*store.listed.lock().unwrap(), 0);
    assert!(store.read_ids().is_empty());
}

#[test]
fn without_store_returns_empty() {
    let finder = KeywordFinder::new(None);
    assert!(finder.search("x", DEFAULT_MAX_RESULTS).is_empty());
}

#[test]
fn documents_without_text_are_skipped_and_one_hit_per_document() {
    let store = TrackingStore::new(&[
        ("scan.pdf", None),
        ("notes.txt", Some("blue blue blue")),
        ("other.txt", Some("nothing here")),
    ]);
    let hits = KeywordFinder::with_store(store.clone()).search("Blue", DEFAULT_MAX_RESULTS);

    assert_eq!(
        hits,
        vec![SearchHit {
            source_id: "notes.txt".into(),
            snippet: "blue blue blue...".into(),
            score: 1.0,
        }]
    );
    assert_eq!(store.read_ids(), vec!["scan.pdf", "notes.txt", "other.txt"]);
}

#[test]
fn snippet_keeps_100_chars_before_and_400_after_match_start() {
    let text = format!("{}{}{}", "x".repeat(300), "Needle", "y".repeat(1000));
    let store = TrackingStore::new(&[("long.txt", Some(text.as_str()))]);
    let hits = KeywordFinder::with_store(store).search("needle", 1);

    let snippet = &hits[0].snippet;
    let body = snippet.strip_suffix("...").unwrap();
    assert_eq!(body.chars().count(), 500);
    assert!(body.starts_with(&format!("{}Needle", "x".repeat(100))));
}

#[test]
fn hit_serializes_with_source_and_content_keys() {
    let hit = SearchHit {
        source_id: "a.pdf".into(),
        snippet: "s...".into(),
        score: 1.0,
    };
    let v = serde_json::to_value(&hit).unwrap();
    assert_eq!(v, serde_json::json!({"source": "a.pdf", "content": "s...", "score": 1.0}));
}

#[test]
fn paper_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "Transformers use attention.").unwrap();
    fs::write(dir.path().join("b.md"), "Nothing relevant.").unwrap();
    fs::write(dir.path().join("c.txt"), "  ATTENTION is all you need  ").unwrap();

    let finder = KeywordFinder::with_store(Arc::new(PaperDirectory::new(dir.path())));
    let hits = finder.search("attention", DEFAULT_MAX_RESULTS);

    let ids: Vec<&str> = hits.iter().map(|h| h.source_id.as_str()).collect();
    assert_eq!(ids, vec!["a.txt", "c.txt"]);
    assert_eq!(hits[1].snippet, "ATTENTION is all you need...");
}
