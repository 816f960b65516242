// src/handlers/prototype.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    ai::{Part, extract::FeedbackKind, prompt},
    error::AppError,
    models::score::{PersonaFeedbackRequest, PrototypeScoreRequest},
    state::AppState,
};

use super::scoring::run_scoring;

/// Scores a Concept Poster plus its uploaded visuals through the multimodal
/// relay.
///
/// Uploads arrive as data URLs; the payload after the comma is forwarded as
/// inline data with the declared MIME type. Entries without a payload are
/// skipped.
pub async fn score_prototype(
    State(state): State<AppState>,
    Json(payload): Json<PrototypeScoreRequest>,
) -> Result<Response, AppError> {
    tracing::info!("Received /api/gemini-score-prototype request");

    let (Some(selected_idea), Some(poster)) = (
        payload.selected_idea.filter(|v| !v.is_empty()),
        payload.poster.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Missing selected idea or poster content.".to_string(),
        ));
    };

    let mut parts = vec![Part::text(prompt::prototype(
        &selected_idea,
        &poster,
        payload.uploads.len(),
    ))];

    for upload in &payload.uploads {
        if let Some((_, data)) = upload.base64.split_once(',') {
            parts.push(Part::inline(upload.r#type.clone(), data));
        } else {
            tracing::warn!("Skipping upload '{}' without a data payload", upload.name);
        }
    }

    run_scoring(&state, parts, FeedbackKind::Prototype).await
}

/// Asks the model to react to a prototype in character as the given persona.
/// The reply is plain prose; no JSON extraction applies here.
pub async fn persona_feedback(
    State(state): State<AppState>,
    Json(payload): Json<PersonaFeedbackRequest>,
) -> Result<Response, AppError> {
    tracing::info!("Received /api/gemini-persona request");

    let (Some(persona), Some(prototype_data), Some(problem_title)) = (
        payload.persona,
        payload.prototype_data,
        payload.problem_title.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Missing persona, prototype data, or problem title.".to_string(),
        ));
    };

    let prompt = prompt::persona_feedback(
        &persona.name,
        &persona.role,
        &prototype_data.poster_notes,
        &prototype_data.timeline_notes,
        &problem_title,
    );

    match state.backend.generate(vec![Part::text(prompt)]).await {
        Ok(text) => Ok(Json(json!({ "feedback": text })).into_response()),
        Err(e) => {
            tracing::error!("Error calling model API for persona feedback: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to get persona feedback from AI. Please try again later.",
                    "details": e.to_string(),
                })),
            )
                .into_response())
        }
    }
}
