//! Chat-completion wire types and the OpenAI-compatible provider (Groq by default).

use std::pin::Pin;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_stream::stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Raw provider deltas, before empty ones are filtered out.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    /// Plain text of the message (text parts only).
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(t) => t.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// Outbound-call collaborator. Implementations report faults as `Err`;
/// the generators turn them into user-facing text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
    /// The returned stream must not read ahead of the consumer.
    async fn stream(&self, request: &ChatRequest) -> Result<DeltaStream>;
    fn name(&self) -> &'static str;
}

#[derive(Deserialize)]
struct CompletionResp {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMsg,
}

#[derive(Deserialize)]
struct CompletionMsg {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ProviderFault>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderFault {
    #[serde(default)]
    message: String,
}

/// Decode one SSE `data:` payload into its content delta (may be empty).
fn decode_delta(payload: &str) -> Result<String> {
    let chunk: StreamChunk =
        serde_json::from_str(payload).context("malformed completion chunk")?;
    if let Some(fault) = chunk.error {
        bail!("provider error: {}", fault.message);
    }
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .unwrap_or_default())
}

/// Decode an SSE completion body into text deltas, stopping at `[DONE]`.
///
/// Nothing is read from `bytes` until the returned stream is polled.
fn delta_stream<S, B, E>(bytes: S) -> DeltaStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(stream! {
        let events = bytes.eventsource();
        futures_util::pin_mut!(events);
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(ev) => ev,
                Err(e) => {
                    yield Err(anyhow!("reading completion stream: {e}"));
                    return;
                }
            };
            if event.data == "[DONE]" {
                return;
            }
            if event.data.is_empty() {
                continue;
            }
            match decode_delta(&event.data) {
                Ok(text) => yield Ok(text),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    })
}

/// Chat Completions over HTTP (Groq, OpenAI, or any compatible endpoint).
pub struct OpenAiCompatProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(api_key: &str, cfg: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("research-relay/0.1")
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("provider returned {status}: {}", body.trim()));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let resp = self.send(request).await?;
        let body: CompletionResp = resp.json().await.context("malformed completion reply")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("completion reply had no content"))
    }

    async fn stream(&self, request: &ChatRequest) -> Result<DeltaStream> {
        let resp = self.send(request).await?;
        Ok(delta_stream(resp.bytes_stream()))
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}
