//! Preferences API tests.

mod common;

use common::fixtures;
use common::TestContext;

/// Test simulated mode is off by default.
#[tokio::test]
async fn test_get_preferences_default() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/preferences").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["simulated_mode"], false);
}

/// Test updating simulated mode.
#[tokio::test]
async fn test_update_preferences() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .put("/api/preferences")
        .json(&serde_json::json!({ "simulated_mode": true }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["simulated_mode"], true);
    assert!(ctx.preferences.simulated_mode());

    // An empty update changes nothing
    let body: serde_json::Value = server
        .put("/api/preferences")
        .json(&serde_json::json!({}))
        .await
        .json();
    assert_eq!(body["simulated_mode"], true);
}

/// Test the flag reaches the extraction service on the next attempt.
#[tokio::test]
async fn test_simulated_mode_applies_to_next_submit() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .post("/api/ingest/submit")
        .json(&fixtures::submit_request("Some text.", false))
        .await
        .assert_status_ok();

    server
        .put("/api/preferences")
        .json(&serde_json::json!({ "simulated_mode": true }))
        .await
        .assert_status_ok();

    server
        .post("/api/ingest/submit")
        .json(&fixtures::submit_request("Some text.", false))
        .await
        .assert_status_ok();

    let calls = ctx.extract_calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].simulated);
    assert!(calls[1].simulated);
}
