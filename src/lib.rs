// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod generate;
pub mod metrics;
pub mod news;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::bootstrap::Services;
pub use crate::generate::{ImageAnalyzer, ResponseGenerator};
pub use crate::news::NewsLookup;
pub use crate::search::KeywordFinder;
