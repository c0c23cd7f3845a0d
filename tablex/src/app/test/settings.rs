use crate::{
    app::test::{TestState, TestStateConfig, TEST_API_KEY},
    core::extractor::mock::ScriptedExtractor,
};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn config_hides_the_key() {
    let state = TestState::scripted(ScriptedExtractor::default());

    let response = state.server.get("/api/config").await;

    assert_eq!(StatusCode::OK, response.status_code());
    assert_eq!(
        json!({
            "hasApiKey": true,
            "baseUrl": "http://localhost:1",
            "httpReferer": "http://localhost:3000"
        }),
        response.json::<Value>()
    );
    assert!(!response.text().contains(TEST_API_KEY));
}

#[tokio::test]
async fn config_update_applies_to_later_requests() {
    let state = TestState::upstream(TestStateConfig {
        api_key: None,
        ..Default::default()
    });

    let response = state
        .server
        .post("/api/config")
        .json(&json!({ "apiKey": TEST_API_KEY, "baseUrl": "https://openrouter.example/api/v1" }))
        .await;

    assert_eq!(StatusCode::OK, response.status_code());

    let body: Value = response.json();
    assert_eq!(true, body["success"]);
    assert_eq!(true, body["config"]["hasApiKey"]);
    assert_eq!("https://openrouter.example/api/v1", body["config"]["baseUrl"]);
    assert!(!response.text().contains(TEST_API_KEY));

    let body: Value = state.server.get("/api/config").await.json();
    assert_eq!(true, body["hasApiKey"]);
    assert_eq!("https://openrouter.example/api/v1", body["baseUrl"]);
    assert_eq!("http://localhost:3000", body["httpReferer"]);
}

#[tokio::test]
async fn invalid_key_is_rejected() {
    let state = TestState::upstream(TestStateConfig {
        api_key: None,
        ..Default::default()
    });

    let response = state
        .server
        .post("/api/config")
        .json(&json!({ "apiKey": "abc" }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, response.status_code());
    assert_eq!(false, response.json::<Value>()["success"]);

    let body: Value = state.server.get("/api/config").await.json();
    assert_eq!(false, body["hasApiKey"]);
}

#[tokio::test]
async fn service_info_and_health() {
    let state = TestState::scripted(ScriptedExtractor::default());

    let body: Value = state.server.get("/").await.json();
    assert_eq!("test", body["environment"]);
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());

    let response = state.server.get("/_health").await;
    assert_eq!(StatusCode::OK, response.status_code());
    assert_eq!("OK", response.text());
}
