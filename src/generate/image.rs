use std::sync::Arc;

use super::generator::{fragments, single_fragment, Backend, TextStream};
use super::provider::{ChatMessage, ChatProvider, ChatRequest, ContentPart, ImageUrl};
use crate::config::LlmConfig;

pub const IMAGE_DISABLED_MESSAGE: &str = "AI service is not configured.";

/// Streams a vision-model description of one image. No persona is sent.
pub struct ImageAnalyzer {
    backend: Backend,
    vision_model: String,
}

impl ImageAnalyzer {
    pub fn from_config(cfg: &LlmConfig) -> Self {
        Self {
            backend: Backend::from_config(cfg, "image"),
            vision_model: cfg.vision_model.clone(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
            vision_model: LlmConfig::default().vision_model,
        }
    }

    pub fn with_provider(provider: Arc<dyn ChatProvider>, vision_model: impl Into<String>) -> Self {
        Self {
            backend: Backend::Ready(provider),
            vision_model: vision_model.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn build_request(&self, prompt: &str, image_data: &str) -> ChatRequest {
        ChatRequest {
            model: self.vision_model.clone(),
            messages: vec![ChatMessage::user_parts(vec![
                ContentPart::Text {
                    text: prompt.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_reference(image_data),
                    },
                },
            ])],
            stream: true,
        }
    }

    pub fn analyze_image_stream(&self, prompt: &str, image_data: &str) -> TextStream {
        match &self.backend {
            Backend::Disabled => single_fragment(IMAGE_DISABLED_MESSAGE),
            Backend::Ready(provider) => fragments(
                Arc::clone(provider),
                self.build_request(prompt, image_data),
                "image",
                "Error analyzing image: ",
            ),
        }
    }
}

/// URLs and data URIs pass through; anything else is taken as base64 JPEG bytes.
/// The payload itself is never validated.
pub fn image_reference(image_data: &str) -> String {
    if image_data.starts_with("http://")
        || image_data.starts_with("https://")
        || image_data.starts_with("data:")
    {
        image_data.to_string()
    } else {
        format!("data:image/jpeg;base64,{image_data}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn url_passes_through_and_base64_is_wrapped() {
        assert_eq!(
            image_reference("http://example.com/a.jpg"),
            "http://example.com/a.jpg"
        );
        assert_eq!(image_reference("Zm9v"), "data:image/jpeg;base64,Zm9v");
        assert_eq!(
            image_reference("data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn request_has_single_user_message_with_two_parts() {
        let a = ImageAnalyzer::disabled();
        let req = a.build_request("describe", "Zm9v");
        assert_eq!(req.model, "llama-3.2-90b-vision-preview");
        assert!(req.stream);
        assert_eq!(req.messages.len(), 1);
        let v = serde_json::to_value(&req.messages[0]).unwrap();
        assert_eq!(v["content"][0]["text"], "describe");
        assert_eq!(
            v["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,Zm9v"
        );
    }

    #[tokio::test]
    async fn disabled_analyzer_yields_one_message() {
        let frags: Vec<String> = ImageAnalyzer::disabled()
            .analyze_image_stream("p", "Zm9v")
            .collect()
            .await;
        assert_eq!(frags, vec![IMAGE_DISABLED_MESSAGE.to_string()]);
    }
}
