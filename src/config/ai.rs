// src/config/ai.rs
use serde::{Deserialize, Serialize};

pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";

pub const DEFAULT_PERSONA: &str = "You are an advanced AI assistant developed by the 'Zencoders AI Team' from BEC (Bapatla Engineering College). \
Your primary goal is to assist users with their queries, research, and analysis tasks. \
If asked about your identity, creation, or origin, you must always state that you were developed by the Zencoders AI Team from BEC. \
You are helpful, professional, and knowledgeable.";

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
fn default_text_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}
fn default_vision_model() -> String {
    "llama-3.2-90b-vision-preview".to_string()
}
fn default_persona() -> Option<String> {
    Some(DEFAULT_PERSONA.to_string())
}
fn default_connect_timeout_secs() -> u64 {
    4
}

/// LLM provider settings (`[llm]` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Missing or "ENV" means: read from GROQ_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// System persona. An empty string disables the system message.
    #[serde(default = "default_persona")]
    pub persona: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            persona: default_persona(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Resolve the key against the environment and normalize the persona.
    pub fn resolve(mut self) -> Self {
        self.api_key = super::resolve_secret(self.api_key.take(), ENV_GROQ_API_KEY);
        self.persona = self
            .persona
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self
    }

    /// Settings for tests/tools pointing at a custom endpoint.
    pub fn with_key(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn key_len(&self) -> usize {
        self.api_key.as_deref().map(str::len).unwrap_or(0)
    }
}
