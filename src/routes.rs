// src/routes.rs

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{avatar, chat, prototype, quest, scoring},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the relay, quest and proxy endpoints under /api.
/// * Serves the compiled front-end bundle with an index.html fallback for
///   client-side routes.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    // The browser bundle may be served from anywhere, and the avatar viewer
    // loads proxied models cross-origin, so CORS stays wide open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    // let governor_conf = GovernorConfigBuilder::default()
    //     .per_second(2)
    //     .burst_size(5)
    //     .finish()
    //     .unwrap();

    // let governor_conf = Arc::new(governor_conf);

    let api_routes = Router::new()
        .route("/gemini-chat", post(chat::persona_chat))
        .route("/gemini-score", post(scoring::score_stage))
        .route("/gemini-score-prototype", post(prototype::score_prototype))
        .route("/gemini-persona", post(prototype::persona_feedback))
        .route("/complete-quest", post(quest::complete_quest))
        .route("/leaderboard", get(quest::get_leaderboard))
        .route("/rpm-avatar-proxy", get(avatar::proxy_avatar))
        .route("/update-avatar", post(avatar::update_avatar));

    // SPA catchall: unknown paths fall back to the bundle's index.html.
    let static_dir = Path::new(&state.config.static_dir).to_path_buf();
    let spa = ServeDir::new(&static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(spa)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // .layer(GovernorLayer::new(governor_conf))
        .with_state(state)
}
