// src/ai/mock.rs

//! Mock generative backend for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::{GenerativeBackend, LlmError, Part, TextStream};

enum CannedReply {
    Text(String),
    Error(String),
}

/// Mock backend with queued canned replies.
///
/// Records how many times it was invoked and the last prompt it received, so
/// tests can assert that input validation short-circuits before any model call.
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<CannedReply>>,
    call_count: AtomicU32,
    last_parts: Mutex<Option<Vec<Part>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next invocation.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(CannedReply::Text(text.into()));
    }

    /// Queue a transport failure for the next invocation.
    pub fn push_error(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(CannedReply::Error(message.into()));
    }

    /// Number of times either generate method was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Concatenated text parts of the most recent prompt.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_parts.lock().unwrap().as_ref().map(|parts| {
            parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text(text) => Some(text.as_str()),
                    Part::InlineData { .. } => None,
                })
                .collect()
        })
    }

    /// Parts of the most recent prompt, inline data included.
    pub fn last_parts(&self) -> Option<Vec<Part>> {
        self.last_parts.lock().unwrap().clone()
    }

    fn record(&self, parts: Vec<Part>) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_parts.lock().unwrap() = Some(parts);

        match self.replies.lock().unwrap().pop_front() {
            Some(CannedReply::Text(text)) => Ok(text),
            Some(CannedReply::Error(message)) => Err(LlmError::Transport(message)),
            None => Ok("Mock reply".to_string()),
        }
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, parts: Vec<Part>) -> Result<String, LlmError> {
        self.record(parts)
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, LlmError> {
        let text = self.record(vec![Part::text(prompt)])?;

        // Hand the reply back in small chunks so callers exercise real
        // incremental consumption.
        let chunks: Vec<Result<String, LlmError>> = text
            .chars()
            .collect::<Vec<_>>()
            .chunks(8)
            .map(|c| Ok(c.iter().collect()))
            .collect();

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
