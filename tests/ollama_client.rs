use mockito::Matcher;
use serde_json::json;

use scout_assistant::config::ScoutConfig;
use scout_assistant::generation::{GenerationError, Generator, OllamaClient};

fn client_for(server: &mockito::ServerGuard) -> OllamaClient {
    let cfg = ScoutConfig {
        llm_url: server.url(),
        ..ScoutConfig::default()
    };
    OllamaClient::new(&cfg)
}

#[test]
fn generate_returns_trimmed_response_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "qwen2.5:7b",
            "prompt": "who is the fastest?",
            "stream": false,
            "options": { "top_k": 35, "num_predict": 900 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"qwen2.5:7b","response":"  Mbappe is the pick.\n","done":true}"#)
        .create();

    let answer = client_for(&server)
        .generate("who is the fastest?")
        .expect("generation should succeed");
    assert_eq!(answer, "Mbappe is the pick.");
    mock.assert();
}

#[test]
fn generate_without_response_field_uses_placeholder() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"done":true}"#)
        .create();

    let answer = client_for(&server).generate("hi").expect("generation should succeed");
    assert_eq!(answer, "No response generated");
    mock.assert();
}

#[test]
fn generate_maps_error_status() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(503)
        .with_body("model is loading")
        .create();

    let err = client_for(&server).generate("hi").unwrap_err();
    assert!(matches!(err, GenerationError::Status(503)));
    assert_eq!(err.to_string(), "Error: LLM returned status 503");
    mock.assert();
}

#[test]
fn generate_reports_unreadable_body() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create();

    let err = client_for(&server).generate("hi").unwrap_err();
    assert!(matches!(err, GenerationError::Decode(_)));
    assert!(err.to_string().starts_with("Error calling LLM: unreadable response"));
}

#[test]
fn availability_follows_tags_endpoint() {
    let mut down_server = mockito::Server::new();
    let down = down_server.mock("GET", "/api/tags").with_status(500).create();
    assert!(!client_for(&down_server).is_available());
    down.assert();

    let mut up_server = mockito::Server::new();
    let up = up_server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"models":[]}"#)
        .create();
    assert!(client_for(&up_server).is_available());
    up.assert();
}
