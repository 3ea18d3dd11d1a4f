use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use scout_assistant::assistant::ScoutAssistant;
use scout_assistant::generation::{GenerationError, Generator};
use scout_assistant::player_table::PlayerTable;
use scout_assistant::server::{HealthResponse, QueryResponse, create_router};

fn fixture_table() -> PlayerTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("forwards.csv");
    PlayerTable::load_csv(&path).expect("fixture should load")
}

struct CannedGenerator;

impl Generator for CannedGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok("Mbappe edges it.".to_string())
    }
}

fn query_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/query")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn query_returns_answer_and_sources() {
    let app = create_router(Arc::new(ScoutAssistant::new(fixture_table(), CannedGenerator)));
    let resp = app
        .oneshot(query_request(r#"{"query":"compare Mbappe vs Haaland"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: QueryResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.response, "Mbappe edges it.");
    assert_eq!(body.sources, vec!["Kylian Mbappe", "Erling Haaland"]);
}

#[tokio::test]
async fn health_reports_basic_mode() {
    let app = create_router(Arc::new(ScoutAssistant::offline(fixture_table())));
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.status, "healthy");
    assert!(body.ready);
    assert!(body.basic_mode);
}

#[tokio::test]
async fn malformed_query_body_is_rejected() {
    let app = create_router(Arc::new(ScoutAssistant::offline(fixture_table())));
    let resp = app
        .oneshot(query_request(r#"{"question":"best strikers"}"#))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
