//! Prompt templates for the text operations.

use serde::{Deserialize, Serialize};

pub const COMPARE_SEPARATOR: &str = "\n\n---\n\n";

/// One text operation and its payload. Built per call, dropped after use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Summarize {
        text: String,
    },
    Answer {
        #[serde(default)]
        context: Option<String>,
        question: String,
    },
    Compare {
        documents: Vec<String>,
    },
    Insight {
        topic: String,
    },
    Raw {
        prompt: String,
    },
}

impl GenerationRequest {
    /// Operation label used in logs and metrics.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Summarize { .. } => "summarize",
            Self::Answer { .. } => "answer",
            Self::Compare { .. } => "compare",
            Self::Insight { .. } => "insight",
            Self::Raw { .. } => "raw",
        }
    }

    /// The user prompt sent to the provider.
    pub fn prompt(&self) -> String {
        match self {
            Self::Summarize { text } => summarize_prompt(text),
            Self::Answer { context, question } => answer_prompt(context.as_deref(), question),
            Self::Compare { documents } => compare_prompt(documents),
            Self::Insight { topic } => insight_prompt(topic),
            Self::Raw { prompt } => prompt.clone(),
        }
    }
}

pub fn summarize_prompt(text: &str) -> String {
    format!("Please provide a concise summary of the following text:\n\n{text}")
}

/// An empty context counts as no context.
pub fn answer_prompt(context: Option<&str>, question: &str) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Context:\n{context}\n\nQuestion: {question}\n\n\
             Answer the question based on the context provided. \
             If the answer is not in the context, use your general knowledge."
        ),
        None => format!("Question: {question}\n\nAnswer the question clearly and concisely."),
    }
}

pub fn compare_prompt<S: AsRef<str>>(documents: &[S]) -> String {
    let combined = documents
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(COMPARE_SEPARATOR);
    format!(
        "Compare the following papers (separated by ---) and highlight key similarities and differences:\n\n{combined}"
    )
}

pub fn insight_prompt(topic: &str) -> String {
    format!("Provide a key research insight or trend regarding: {topic}")
}
