// tests/quest_tests.rs

use backend::ai::MockBackend;
use backend::{config::Config, routes, state::AppState};
use std::sync::Arc;

async fn spawn_app() -> String {
    let config = Config {
        gemini_api_key: "test-key".to_string(),
        gemini_model: "gemini-2.0-flash".to_string(),
        // Nothing listens here; outbound calls fail fast.
        pocketbase_url: "http://127.0.0.1:1".to_string(),
        static_dir: "dist".to_string(),
        port: 0,
        rust_log: "error".to_string(),
    };

    let state = AppState::with_backend(config, Arc::new(MockBackend::new()));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn post_quest(
    client: &reqwest::Client,
    address: &str,
    user: &str,
    problem_id: serde_json::Value,
    score: f64,
    solution: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/complete-quest", address))
        .json(&serde_json::json!({
            "userId": user,
            "problemId": problem_id,
            "totalScore": score,
            "solution": solution
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn complete_quest_requires_all_fields() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/complete-quest", address))
        .json(&serde_json::json!({"userId": "amahle", "problemId": 1}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing totalScore, problemId, userId, or solution.");
}

#[tokio::test]
async fn complete_quest_returns_rewards() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = post_quest(
        &client,
        &address,
        "amahle",
        serde_json::json!(1),
        410.0,
        "Solar-powered study pods",
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["rank"], 82, "round(410 / 500 * 100)");
    assert_eq!(body["reward"], 200);
    assert_eq!(body["badge"], "Innovator");
    assert_eq!(body["message"], "Quest completed successfully!");
}

#[tokio::test]
async fn leaderboard_sorts_and_ranks_per_problem() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    post_quest(&client, &address, "amahle", serde_json::json!(1), 310.0, "Battery carts").await;
    post_quest(&client, &address, "bongani", serde_json::json!(1), 455.0, "Solar pods").await;
    post_quest(&client, &address, "thandi", serde_json::json!("1"), 390.0, "Gas lamps").await;
    // Different problem, must not appear below.
    post_quest(&client, &address, "sipho", serde_json::json!(2), 480.0, "Borehole plan").await;

    let response = client
        .get(&format!("{}/api/leaderboard?problemId=1", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let entries: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0]["userId"], "bongani");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["userId"], "thandi");
    assert_eq!(entries[1]["rank"], 2);
    assert_eq!(entries[2]["userId"], "amahle");
    assert_eq!(entries[2]["rank"], 3);

    // The user id doubles as display name; the title resolves from the catalog.
    assert_eq!(entries[0]["username"], "bongani");
    assert!(
        entries[0]["problemTitle"]
            .as_str()
            .unwrap()
            .contains("Load Shedding")
    );
}

#[tokio::test]
async fn leaderboard_requires_problem_id() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/leaderboard", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing problemId query parameter.");
}

#[tokio::test]
async fn leaderboard_solutions_are_sanitized() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    post_quest(
        &client,
        &address,
        "amahle",
        serde_json::json!(3),
        400.0,
        "Walk-bus roster <script>alert('xss')</script> with parent marshals",
    )
    .await;

    let response = client
        .get(&format!("{}/api/leaderboard?problemId=3", address))
        .send()
        .await
        .expect("Failed to execute request");

    let entries: Vec<serde_json::Value> = response.json().await.unwrap();
    let solution = entries[0]["solution"].as_str().unwrap();
    assert!(!solution.contains("<script>"));
    assert!(solution.contains("Walk-bus roster"));
}

#[tokio::test]
async fn avatar_proxy_requires_url() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/rpm-avatar-proxy", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing URL query parameter.");
}

#[tokio::test]
async fn avatar_proxy_unreachable_host_fails_generically() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!(
            "{}/api/rpm-avatar-proxy?url=http://127.0.0.1:1/avatar.glb",
            address
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to proxy avatar. Please try again later.");
}

#[tokio::test]
async fn avatar_proxy_rejects_unparseable_url() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/rpm-avatar-proxy?url=not-a-url", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn update_avatar_requires_fields() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/update-avatar", address))
        .json(&serde_json::json!({"userId": "u1"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing userId or avatarUrl in request body.");
}

#[tokio::test]
async fn update_avatar_validates_url_shape() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/update-avatar", address))
        .json(&serde_json::json!({"userId": "u1", "avatarUrl": "not a url"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_avatar_upstream_failure_reports_details() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/update-avatar", address))
        .json(&serde_json::json!({
            "userId": "u1",
            "avatarUrl": "https://models.readyplayer.me/abc.glb"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // The hosted backend is unreachable in tests.
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to update avatar.");
    assert!(body["details"].as_str().is_some());
}
