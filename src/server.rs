//! HTTP front end: `POST /query` and `GET /health` over a shared assistant.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::assistant::ScoutAssistant;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ScoutAssistant>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub ready: bool,
    /// The answer service is off and queries get basic-mode answers.
    pub basic_mode: bool,
}

pub fn create_router(assistant: Arc<ScoutAssistant>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/query", post(process_query))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { assistant })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Scout Assistant API is running".to_string(),
        ready: !state.assistant.table().is_empty(),
        basic_mode: state.assistant.is_offline(),
    })
}

// The pipeline and the generation client block, so each query runs on the
// blocking pool.
async fn process_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    info!("query: {}", request.query);
    let assistant = Arc::clone(&state.assistant);
    let answer = tokio::task::spawn_blocking(move || assistant.process_query(&request.query))
        .await
        .map_err(|err| {
            warn!("query worker failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })?;
    Ok(Json(QueryResponse {
        response: answer.answer,
        sources: answer.sources,
    }))
}
