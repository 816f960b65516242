use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::ai::{GeminiClient, GenerativeBackend};
use crate::config::Config;
use crate::models::quest::CompletedQuest;

/// Process-lifetime list of completed quests; not durable across restarts.
pub type Leaderboard = Arc<RwLock<Vec<CompletedQuest>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn GenerativeBackend>,
    pub leaderboard: Leaderboard,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(GeminiClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
        ));
        Self::with_backend(config, backend)
    }

    /// Build state around an arbitrary backend; tests inject a mock here.
    pub fn with_backend(config: Config, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            config,
            backend,
            leaderboard: Arc::new(RwLock::new(Vec::new())),
            http: reqwest::Client::new(),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
