// src/handlers/chat.rs

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{ai::prompt, error::AppError, state::AppState};

/// DTO for a persona interview question.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub backstory: Option<String>,
    pub question: Option<String>,
}

/// Streams a persona's in-character answer back as it is generated.
///
/// The reply is written incrementally with `text/event-stream` headers, the
/// chunks being raw model text. A client navigating away simply drops the
/// connection; the in-flight upstream call is abandoned with it.
pub async fn persona_chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let (Some(name), Some(role), Some(backstory), Some(question)) = (
        non_empty(payload.name),
        non_empty(payload.role),
        non_empty(payload.backstory),
        non_empty(payload.question),
    ) else {
        return Err(AppError::BadRequest(
            "Missing persona details or question.".to_string(),
        ));
    };

    let prompt = prompt::persona_chat(&name, &role, &backstory, &question);

    match state.backend.generate_stream(&prompt).await {
        Ok(stream) => {
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "text/event-stream")
                .header(header::CACHE_CONTROL, "no-cache")
                .body(Body::from_stream(stream))
                .map_err(|e| AppError::InternalServerError(e.to_string()))?;
            Ok(response)
        }
        Err(e) => {
            tracing::error!("Error calling model API for chat: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to get response from AI. Please try again later.",
                    "details": e.to_string(),
                })),
            )
                .into_response())
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
