// src/config.rs

use dotenvy::dotenv;
use std::env;

/// A stage submission must reach this score before the next stage unlocks.
pub const STAGE_PASS_THRESHOLD: f64 = 70.0;

/// Maximum aggregate score across the five stages (100 per stage).
pub const QUEST_MAX_SCORE: f64 = 500.0;

/// Base token reward for finishing a quest; the payout is doubled on completion.
pub const QUEST_BASE_REWARD: i64 = 100;

/// Badge awarded on quest completion.
pub const QUEST_BADGE: &str = "Innovator";

/// Avatar shown for leaderboard entries until users pick their own.
pub const DEFAULT_AVATAR_URL: &str =
    "https://models.readyplayer.me/690dd5c4672cca15c22548fe.glb";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub pocketbase_url: String,
    pub static_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .expect("GEMINI_API_KEY must be set");

        let gemini_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let pocketbase_url = env::var("POCKETBASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string());

        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "dist".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            gemini_api_key,
            gemini_model,
            pocketbase_url,
            static_dir,
            port,
            rust_log,
        }
    }
}
