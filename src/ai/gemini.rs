// src/ai/gemini.rs

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerativeBackend, LlmError, Part, TextStream};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// REST client for the hosted Gemini generative-AI API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the client at a different API host (self-hosted gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: parts.into_iter().map(PartPayload::from).collect(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<PartPayload>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PartPayload {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlinePayload,
    },
}

#[derive(Debug, Serialize)]
struct InlinePayload {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

impl From<Part> for PartPayload {
    fn from(part: Part) -> Self {
        match part {
            Part::Text(text) => PartPayload::Text { text },
            Part::InlineData { mime_type, data } => PartPayload::Inline {
                inline_data: InlinePayload { mime_type, data },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Pull complete `data:` lines out of the SSE buffer and collect their chunk
/// text. Incomplete trailing lines stay in the buffer for the next read.
fn drain_sse_texts(buf: &mut String) -> Vec<String> {
    let mut texts = Vec::new();

    while let Some(newline) = buf.find('\n') {
        let line: String = buf.drain(..=newline).collect();
        let line = line.trim();

        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();

        // Keep-alives and non-JSON frames are skipped.
        if let Ok(chunk) = serde_json::from_str::<GenerateResponse>(payload) {
            if let Some(text) = chunk.text() {
                texts.push(text);
            }
        }
    }

    texts
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, parts: Vec<Part>) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(&GenerateRequest::user(parts))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            message.truncate(300);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        reply.text().ok_or(LlmError::EmptyReply)
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, LlmError> {
        let response = self
            .client
            .post(self.stream_url())
            .json(&GenerateRequest::user(vec![Part::text(prompt)]))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            message.truncate(300);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let stream = futures::stream::try_unfold(
            (response.bytes_stream(), String::new()),
            |(mut body, mut buf)| async move {
                loop {
                    let Some(next) = body.next().await else {
                        return Ok(None);
                    };
                    let chunk = next.map_err(|e| LlmError::Transport(e.to_string()))?;
                    buf.push_str(&String::from_utf8_lossy(&chunk));

                    let texts = drain_sse_texts(&mut buf);
                    if !texts.is_empty() {
                        return Ok(Some((texts.concat(), (body, buf))));
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_complete_data_lines_only() {
        let mut buf = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello \"}]}}]}\n",
            "\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"wor",
        )
        .to_string();

        let texts = drain_sse_texts(&mut buf);
        assert_eq!(texts, vec!["Hello ".to_string()]);
        // The partial frame stays buffered until the rest arrives.
        assert!(buf.starts_with("data: "));

        buf.push_str("ld\"}]}}]}\n");
        let texts = drain_sse_texts(&mut buf);
        assert_eq!(texts, vec!["world".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn ignores_non_json_frames() {
        let mut buf = "data: [DONE]\n: keep-alive\n".to_string();
        assert!(drain_sse_texts(&mut buf).is_empty());
    }

    #[test]
    fn inline_parts_serialize_with_mime_type() {
        let request = GenerateRequest::user(vec![
            Part::text("describe this"),
            Part::inline("image/png", "AAAA"),
        ]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "describe this");
        assert_eq!(
            value["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
    }
}
