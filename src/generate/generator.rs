//! ResponseGenerator: text operations over one chat-completion primitive.
//! Faults never reach the caller; they degrade to placeholder text.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use metrics::counter;
use tracing::{debug, error, info, warn};

use super::prompts::{self, GenerationRequest};
use super::provider::{ChatMessage, ChatProvider, ChatRequest, OpenAiCompatProvider};
use crate::config::LlmConfig;

pub const DISABLED_MESSAGE: &str = "AI service is not configured (missing API key).";
pub const UNAVAILABLE_MESSAGE: &str =
    "I'm having trouble connecting to the AI right now. Please try again later.";

/// Lazy, finite, pull-driven sequence of text fragments.
pub type TextStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Output of one operation: completed text, or fragments in arrival order.
pub enum GenerationResult {
    Text(String),
    Stream(TextStream),
}

impl GenerationResult {
    /// Drain into a single string (streams are concatenated).
    pub async fn into_text(self) -> String {
        match self {
            Self::Text(t) => t,
            Self::Stream(s) => s.collect::<Vec<_>>().await.concat(),
        }
    }
}

/// Decided once at construction; never re-checked against the environment.
#[derive(Clone)]
pub(crate) enum Backend {
    Disabled,
    Ready(Arc<dyn ChatProvider>),
}

impl Backend {
    pub(crate) fn from_config(cfg: &LlmConfig, component: &'static str) -> Self {
        let Some(key) = cfg.api_key.as_deref() else {
            warn!(component, "GROQ_API_KEY not found; AI features will not work");
            return Self::Disabled;
        };
        match OpenAiCompatProvider::new(key, cfg) {
            Ok(p) => {
                info!(component, base_url = %cfg.base_url, key_len = key.len(), "LLM backend ready");
                Self::Ready(Arc::new(p))
            }
            Err(e) => {
                error!(component, error = ?e, "failed to build LLM client; AI features disabled");
                Self::Disabled
            }
        }
    }
}

/// One-fragment stream carrying a fixed message.
pub(crate) fn single_fragment(msg: &str) -> TextStream {
    Box::pin(futures_util::stream::iter([msg.to_string()]))
}

/// Stream provider deltas, dropping empty ones. A fault yields one
/// `{error_prefix}{cause}` fragment and ends the stream.
pub(crate) fn fragments(
    provider: Arc<dyn ChatProvider>,
    request: ChatRequest,
    op: &'static str,
    error_prefix: &'static str,
) -> TextStream {
    Box::pin(stream! {
        counter!("llm_requests_total", "op" => op).increment(1);
        let mut deltas = match provider.stream(&request).await {
            Ok(s) => s,
            Err(e) => {
                error!(op, provider = provider.name(), error = ?e, "stream request failed");
                counter!("llm_provider_errors_total", "op" => op).increment(1);
                yield format!("{error_prefix}{e:#}");
                return;
            }
        };
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) if text.is_empty() => continue,
                Ok(text) => yield text,
                Err(e) => {
                    error!(op, provider = provider.name(), error = ?e, "stream aborted");
                    counter!("llm_provider_errors_total", "op" => op).increment(1);
                    yield format!("{error_prefix}{e:#}");
                    return;
                }
            }
        }
    })
}

pub struct ResponseGenerator {
    backend: Backend,
    model: String,
    persona: Option<String>,
}

impl ResponseGenerator {
    pub fn from_config(cfg: &LlmConfig) -> Self {
        Self {
            backend: Backend::from_config(cfg, "generator"),
            model: cfg.text_model.clone(),
            persona: cfg.persona.clone(),
        }
    }

    /// A generator that answers every call with [`DISABLED_MESSAGE`].
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
            model: LlmConfig::default().text_model,
            persona: None,
        }
    }

    /// Bare generator (no persona) over an explicit provider.
    pub fn with_provider(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            backend: Backend::Ready(provider),
            model: model.into(),
            persona: None,
        }
    }

    pub fn with_persona(mut self, persona: Option<String>) -> Self {
        self.persona = persona.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Persona as system message (if any), then the prompt as user message.
    pub fn build_request(&self, prompt: &str, stream: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(persona) = &self.persona {
            messages.push(ChatMessage::system(persona.as_str()));
        }
        messages.push(ChatMessage::user(prompt));
        ChatRequest {
            model: self.model.clone(),
            messages,
            stream,
        }
    }

    /// Shared primitive behind every synchronous operation.
    pub async fn complete(&self, prompt: &str) -> String {
        self.complete_op("raw", prompt).await
    }

    async fn complete_op(&self, op: &'static str, prompt: &str) -> String {
        let Backend::Ready(provider) = &self.backend else {
            return DISABLED_MESSAGE.to_string();
        };
        let request = self.build_request(prompt, false);
        debug!(op, model = %self.model, prompt_len = prompt.len(), "chat completion");
        counter!("llm_requests_total", "op" => op).increment(1);

        match provider.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                error!(op, provider = provider.name(), error = ?e, "chat completion failed");
                counter!("llm_provider_errors_total", "op" => op).increment(1);
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    pub async fn summarize(&self, text: &str) -> String {
        self.complete_op("summarize", &prompts::summarize_prompt(text))
            .await
    }

    pub async fn answer(&self, context: Option<&str>, question: &str) -> String {
        self.complete_op("answer", &prompts::answer_prompt(context, question))
            .await
    }

    pub async fn compare<S: AsRef<str> + Sync>(&self, documents: &[S]) -> String {
        self.complete_op("compare", &prompts::compare_prompt(documents))
            .await
    }

    pub async fn insight(&self, topic: &str) -> String {
        self.complete_op("insight", &prompts::insight_prompt(topic))
            .await
    }

    /// Streamed variant of [`complete`](Self::complete). Nothing is sent
    /// until the first fragment is polled.
    pub fn complete_stream(&self, prompt: &str) -> TextStream {
        match &self.backend {
            Backend::Disabled => single_fragment(DISABLED_MESSAGE),
            Backend::Ready(provider) => fragments(
                Arc::clone(provider),
                self.build_request(prompt, true),
                "stream",
                "Error: ",
            ),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> String {
        self.complete_op(request.op(), &request.prompt()).await
    }

    pub async fn run(&self, request: GenerationRequest, stream: bool) -> GenerationResult {
        if stream {
            GenerationResult::Stream(self.complete_stream(&request.prompt()))
        } else {
            GenerationResult::Text(self.generate(&request).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::provider::Role;

    #[test]
    fn persona_adds_system_message_first() {
        let g = ResponseGenerator::disabled().with_persona(Some("Be brief.".into()));
        let req = g.build_request("hello", false);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.messages[0].text(), "Be brief.");
        assert_eq!(req.messages[1].role, Role::User);
        assert_eq!(req.messages[1].text(), "hello");
        assert!(!req.stream);
    }

    #[test]
    fn blank_persona_means_user_only() {
        let g = ResponseGenerator::disabled().with_persona(Some("   ".into()));
        let req = g.build_request("hello", true);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
        assert!(req.stream);
    }

    #[tokio::test]
    async fn disabled_generator_answers_with_fixed_message() {
        let g = ResponseGenerator::disabled();
        assert!(!g.is_enabled());
        assert_eq!(g.summarize("x").await, DISABLED_MESSAGE);
        assert_eq!(g.answer(Some("c"), "q").await, DISABLED_MESSAGE);
        assert_eq!(g.compare(&["a", "b"]).await, DISABLED_MESSAGE);
        assert_eq!(g.insight("t").await, DISABLED_MESSAGE);
        let frags: Vec<String> = g.complete_stream("p").collect().await;
        assert_eq!(frags, vec![DISABLED_MESSAGE.to_string()]);
    }
}
