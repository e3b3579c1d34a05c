//! Document store collaborator used by the keyword finder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Source of searchable documents. Listing order is owned by the store.
pub trait DocumentStore: Send + Sync {
    fn list_documents(&self) -> Vec<String>;
    fn document_path(&self, id: &str) -> PathBuf;
    /// `None` when nothing could be extracted.
    fn extract_text(&self, path: &Path) -> Option<String>;
}

/// Papers kept as files in one directory (PDF, plain text, Markdown).
#[derive(Debug, Clone)]
pub struct PaperDirectory {
    root: PathBuf,
}

impl PaperDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for PaperDirectory {
    /// Regular, non-hidden files sorted by name.
    fn list_documents(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %self.root.display(), error = %e, "cannot list papers");
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| !n.starts_with('.'))
            .collect();
        names.sort();
        names
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    fn extract_text(&self, path: &Path) -> Option<String> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = match ext.as_str() {
            "pdf" => {
                let bytes = fs::read(path)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "cannot read paper"))
                    .ok()?;
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "pdf extraction failed"))
                    .ok()?
            }
            "txt" | "md" => fs::read_to_string(path)
                .map_err(|e| warn!(path = %path.display(), error = %e, "cannot read paper"))
                .ok()?,
            _ => return None,
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
