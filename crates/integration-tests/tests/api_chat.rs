//! Integration tests for the completion proxy.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - A running Redis instance
//! - The API server running (cargo run -p cheffy-server)
//! - A valid `OPENAI_API_KEY` in the server's environment
//!
//! Run with: cargo test -p cheffy-integration-tests -- --ignored

use cheffy_integration_tests::{base_url, client, signup_and_login};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Smoke
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", base_url()))
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

// ============================================================================
// Session Gating
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_chat_without_session_is_unauthorized() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/api/chatGpt"))
        .json(&json!({ "prompt": "pancakes", "language": "English" }))
        .send()
        .await
        .expect("Failed to send chat request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(body, json!("Unauthorized"));
}

// ============================================================================
// Window Quota
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and OpenAI credentials"]
async fn test_sixth_call_in_window_is_denied_softly() {
    let client = client();
    let base_url = base_url();
    signup_and_login(&client).await;

    let mut last_remaining = None;
    for _ in 0..5 {
        let resp = client
            .post(format!("{base_url}/api/chatGpt"))
            .json(&json!({ "prompt": "a quick pancake recipe", "language": "English" }))
            .send()
            .await
            .expect("Failed to send chat request");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("Failed to read body");
        assert_eq!(body["rateLimitState"]["allowed"], true);
        last_remaining = body["rateLimitState"]["remaining"].as_u64();
    }
    assert_eq!(last_remaining, Some(0), "fifth call should exhaust the window");

    // Sixth call: still HTTP 200, but the apology instead of a completion
    let resp = client
        .post(format!("{base_url}/api/chatGpt"))
        .json(&json!({ "prompt": "another recipe", "language": "English" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "0");

    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(body["rateLimitState"]["allowed"], false);
    assert!(
        body["json"]["text"]
            .as_str()
            .expect("denied reply should carry text")
            .contains("sending messages too fast")
    );
}

#[tokio::test]
#[ignore = "Requires running API server with a short CHEFFY_RATE_LIMIT_WINDOW_SECS and OpenAI credentials"]
async fn test_quota_resets_after_window_elapses() {
    let client = client();
    let base_url = base_url();
    signup_and_login(&client).await;

    // First call reveals the configured limit, then burn the rest of the window
    let resp = client
        .post(format!("{base_url}/api/chatGpt"))
        .json(&json!({ "prompt": "toast", "language": "English" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert_eq!(resp.status(), StatusCode::OK);
    let mut body: Value = resp.json().await.expect("Failed to read body");
    let limit = body["rateLimitState"]["limit"]
        .as_u64()
        .expect("limit should be a number");

    for _ in 0..limit {
        let resp = client
            .post(format!("{base_url}/api/chatGpt"))
            .json(&json!({ "prompt": "more toast", "language": "English" }))
            .send()
            .await
            .expect("Failed to send chat request");
        assert_eq!(resp.status(), StatusCode::OK);
        body = resp.json().await.expect("Failed to read body");
    }
    assert_eq!(body["rateLimitState"]["allowed"], false);

    // Sleep until just past the boundary the server reported
    let reset_at = body["rateLimitState"]["resetAt"]
        .as_i64()
        .expect("resetAt should be unix millis");
    let now_ms = i64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_millis(),
    )
    .expect("clock out of range");
    let wait_ms = u64::try_from((reset_at - now_ms).max(0)).expect("wait fits in u64") + 250;
    tokio::time::sleep(std::time::Duration::from_millis(wait_ms)).await;

    let resp = client
        .post(format!("{base_url}/api/chatGpt"))
        .json(&json!({ "prompt": "fresh toast", "language": "English" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(body["rateLimitState"]["allowed"], true);
    assert_eq!(
        body["rateLimitState"]["remaining"].as_u64(),
        Some(limit - 1),
        "fresh window should start from full quota"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and OpenAI credentials"]
async fn test_quota_headers_present_on_allowed_call() {
    let client = client();
    let base_url = base_url();
    signup_and_login(&client).await;

    let resp = client
        .post(format!("{base_url}/api/chatGpt"))
        .json(&json!({ "prompt": "pancakes", "language": "English" }))
        .send()
        .await
        .expect("Failed to send chat request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-ratelimit-limit"], "5");
    assert!(resp.headers().contains_key("x-ratelimit-remaining"));

    let body: Value = resp.json().await.expect("Failed to read body");
    assert!(body.get("json").is_some(), "allowed reply should relay the upstream body");
    assert_eq!(body["rateLimitState"]["limit"], 5);
}
