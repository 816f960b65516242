// src/handlers/avatar.rs

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use url::Url;
use validator::Validate;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: Option<String>,
}

/// Passthrough fetch of a remote avatar file.
///
/// The avatar host does not send CORS headers, so the browser cannot load the
/// model directly; this endpoint re-serves the raw bytes with a wildcard
/// origin. No caching, no size limits, no allow-list; any failure collapses
/// into a generic 500.
pub async fn proxy_avatar(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, AppError> {
    let Some(raw_url) = params.url.filter(|v| !v.is_empty()) else {
        return Err(AppError::BadRequest(
            "Missing URL query parameter.".to_string(),
        ));
    };

    match fetch_bytes(&state, &raw_url).await {
        Ok(bytes) => {
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "model/gltf-binary")
                .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
                .header(header::CONTENT_LENGTH, bytes.len())
                .body(Body::from(bytes))
                .map_err(|e| AppError::InternalServerError(e.to_string()))?;
            Ok(response)
        }
        Err(e) => {
            tracing::error!("Error proxying avatar: {}", e);
            Ok(proxy_failure())
        }
    }
}

async fn fetch_bytes(state: &AppState, raw_url: &str) -> Result<bytes::Bytes, String> {
    let url = Url::parse(raw_url).map_err(|e| format!("invalid url: {e}"))?;
    let response = state
        .http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;
    response.bytes().await.map_err(|e| e.to_string())
}

fn proxy_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Failed to proxy avatar. Please try again later."
        })),
    )
        .into_response()
}

/// DTO for persisting a newly created avatar on the user's account record.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvatarRequest {
    pub user_id: Option<String>,
    #[validate(url(message = "avatarUrl must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Forwards an avatar-URL change to the hosted backend's user record.
pub async fn update_avatar(
    State(state): State<AppState>,
    Json(payload): Json<UpdateAvatarRequest>,
) -> Result<Response, AppError> {
    tracing::info!("Received /api/update-avatar request");

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (Some(user_id), Some(avatar_url)) = (
        payload.user_id.filter(|v| !v.is_empty()),
        payload.avatar_url.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Missing userId or avatarUrl in request body.".to_string(),
        ));
    };

    let record_url = format!(
        "{}/api/collections/users/records/{}",
        state.config.pocketbase_url, user_id
    );

    let result = state
        .http
        .patch(&record_url)
        .json(&json!({ "avatarUrl": avatar_url }))
        .send()
        .await
        .and_then(|r| r.error_for_status());

    match result {
        Ok(_) => Ok(Json(json!({ "message": "Avatar updated successfully." })).into_response()),
        Err(e) => {
            tracing::error!("Error updating avatar: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to update avatar.",
                    "details": e.to_string(),
                })),
            )
                .into_response())
        }
    }
}
