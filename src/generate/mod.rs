//! Prompt assembly and response normalization for the LLM provider.

pub mod generator;
pub mod image;
pub mod prompts;
pub mod provider;

pub use generator::{
    GenerationResult, ResponseGenerator, TextStream, DISABLED_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use image::{image_reference, ImageAnalyzer, IMAGE_DISABLED_MESSAGE};
pub use prompts::GenerationRequest;
pub use provider::{ChatMessage, ChatProvider, ChatRequest, DeltaStream, OpenAiCompatProvider};
