// src/ai/mod.rs

pub mod extract;
pub mod gemini;
pub mod mock;
pub mod prompt;

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

pub use gemini::GeminiClient;
pub use mock::MockBackend;

/// Stream of text chunks produced by a streaming completion.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// One part of a multimodal prompt: plain text, or an inline base64 payload
/// (image/PDF) with its MIME type.
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    InlineData { mime_type: String, data: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Network-level failure reaching the model API.
    #[error("model request failed: {0}")]
    Transport(String),

    /// The model API answered with a non-success status.
    #[error("model API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but the reply carried no text.
    #[error("model reply contained no text")]
    EmptyReply,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

/// Seam between the relay handlers and the hosted generative-AI API.
///
/// The production implementation is [`GeminiClient`]; tests inject
/// [`MockBackend`] with canned replies.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Run a (possibly multimodal) prompt to completion and return the full
    /// reply text.
    async fn generate(&self, parts: Vec<Part>) -> Result<String, LlmError>;

    /// Run a text prompt and stream the reply back chunk by chunk.
    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, LlmError>;
}
