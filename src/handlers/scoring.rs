// src/handlers/scoring.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{
    ai::{
        Part,
        extract::{self, FeedbackError, FeedbackKind},
        prompt,
    },
    error::AppError,
    models::score::{DefineFields, EmpathyFields, IdeateFields},
    state::AppState,
};

/// Scores a stage submission through the generative relay.
///
/// The `stage` field picks the prompt template and the required-field checks;
/// missing fields answer 400 before any model call is made.
pub async fn score_stage(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    tracing::info!("Received /api/gemini-score request");

    let Some(stage) = body
        .get("stage")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        return Err(AppError::BadRequest("Missing stage information.".to_string()));
    };

    match stage {
        "empathy" => score_empathy(&state, &body).await,
        "define" => score_define(&state, &body).await,
        "ideate" => score_ideate(&state, &body).await,
        _ => Err(AppError::BadRequest("Invalid stage provided.".to_string())),
    }
}

async fn score_empathy(state: &AppState, body: &Value) -> Result<Response, AppError> {
    let fields: EmpathyFields = serde_json::from_value(body.clone())?;

    let complete = fields
        .empathy_map_input
        .as_deref()
        .is_some_and(|v| !v.is_empty())
        && fields.reflection.as_deref().is_some_and(|v| !v.is_empty())
        && fields.insights.is_some()
        && fields.themes.is_some();
    if !complete {
        return Err(AppError::BadRequest(
            "Missing empathy map input, reflection, insights, or themes for Empathy stage."
                .to_string(),
        ));
    }

    match fields.selected_problem.as_ref() {
        Some(problem) => {
            let prompt = prompt::empathy(&fields, problem);
            run_scoring(state, vec![Part::text(prompt)], FeedbackKind::Stage).await
        }
        None => Err(AppError::BadRequest(
            "Missing selected problem for Empathy stage.".to_string(),
        )),
    }
}

async fn score_define(state: &AppState, body: &Value) -> Result<Response, AppError> {
    let fields: DefineFields = serde_json::from_value(body.clone())?;

    let complete = fields.hmw_list.as_deref().is_some_and(|v| !v.is_empty())
        && fields.themes.as_deref().is_some_and(|v| !v.is_empty())
        && fields.reflection.as_deref().is_some_and(|v| !v.is_empty());

    match fields.selected_problem.as_ref() {
        Some(problem) if complete => {
            let prompt = prompt::define(&fields, problem);
            run_scoring(state, vec![Part::text(prompt)], FeedbackKind::Stage).await
        }
        _ => Err(AppError::BadRequest(
            "Missing HMW list, selected problem, themes, or reflection for Define stage."
                .to_string(),
        )),
    }
}

async fn score_ideate(state: &AppState, body: &Value) -> Result<Response, AppError> {
    let fields: IdeateFields = serde_json::from_value(body.clone())?;

    let complete = fields.hmw.as_deref().is_some_and(|v| !v.is_empty())
        && fields.selected_top3_ideas.is_some()
        && fields.rationale_map.is_some()
        && fields.reflection.as_deref().is_some_and(|v| !v.is_empty());

    match fields.selected_problem.as_ref() {
        Some(problem) if complete => {
            let prompt = prompt::ideate(&fields, problem);
            run_scoring(state, vec![Part::text(prompt)], FeedbackKind::Stage).await
        }
        _ => Err(AppError::BadRequest(
            "Missing HMW, selected top 3 ideas, rationale map, reflection, or selected \
             problem for Ideate stage."
                .to_string(),
        )),
    }
}

/// Shared relay tail: call the backend, extract and validate the feedback
/// object, degrade to the fixed fallback payloads on failure.
pub(crate) async fn run_scoring(
    state: &AppState,
    parts: Vec<Part>,
    kind: FeedbackKind,
) -> Result<Response, AppError> {
    let text = match state.backend.generate(parts).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error calling model API for scoring: {}", e);
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(extract::upstream_fallback(kind, &e.to_string())),
            )
                .into_response());
        }
    };

    match extract::feedback(kind, &text) {
        Ok(value) => Ok(Json(value).into_response()),
        Err(FeedbackError::Parse { raw }) => {
            tracing::error!("Error parsing model score response as JSON");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "AI response could not be parsed. Please try again.",
                    "rawResponse": raw,
                })),
            )
                .into_response())
        }
        Err(FeedbackError::Shape) => {
            tracing::error!("Model score response in unexpected format");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(extract::shape_fallback(kind)),
            )
                .into_response())
        }
    }
}
