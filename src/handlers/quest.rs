// src/handlers/quest.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    config::{QUEST_BADGE, QUEST_BASE_REWARD, QUEST_MAX_SCORE},
    error::AppError,
    models::quest::{
        CompleteQuestRequest, CompletedQuest, LeaderboardParams, problem_id_string, rank_entries,
    },
    state::AppState,
    utils::html::clean_html,
};

/// Records a finished quest and hands back the completion rewards.
///
/// Entries go into the in-memory list only; a restart forgets them. The
/// solution text is sanitized on the way in since the leaderboard re-serves
/// it to other users.
pub async fn complete_quest(
    State(state): State<AppState>,
    Json(payload): Json<CompleteQuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(user_id), Some(problem_id), Some(total_score), Some(solution)) = (
        payload.user_id.filter(|v| !v.is_empty()),
        payload.problem_id.as_ref().and_then(problem_id_string),
        payload.total_score,
        payload.solution.filter(|v| !v.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Missing totalScore, problemId, userId, or solution.".to_string(),
        ));
    };

    let entry = CompletedQuest {
        user_id: user_id.clone(),
        problem_id: problem_id.clone(),
        total_score,
        solution: clean_html(&solution),
        timestamp: chrono::Utc::now(),
    };
    state.leaderboard.write().await.push(entry);

    // Percentage of the maximum score doubles as the headline rank figure.
    let rank = (total_score / QUEST_MAX_SCORE * 100.0).round() as i64;
    let reward = QUEST_BASE_REWARD * 2;
    let badge = QUEST_BADGE;

    tracing::info!(
        "Quest completed by user {} for problem {} with score {}. Rank: {}, Reward: {}, Badge: {}",
        user_id,
        problem_id,
        total_score,
        rank,
        reward,
        badge
    );

    Ok(Json(json!({
        "rank": rank,
        "reward": reward,
        "badge": badge,
        "message": "Quest completed successfully!"
    })))
}

/// Leaderboard for one problem: entries sorted descending by total score with
/// 1-based ranks.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let Some(problem_id) = params.problem_id.filter(|v| !v.is_empty()) else {
        return Err(AppError::BadRequest(
            "Missing problemId query parameter.".to_string(),
        ));
    };

    let quests = state.leaderboard.read().await;
    Ok(Json(rank_entries(&quests, &problem_id)))
}
