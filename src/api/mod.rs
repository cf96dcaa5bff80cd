// src/api/mod.rs
// HTTP surface: POST /chat runs one query through the graph, GET /health
// reports liveness and backend readiness.

pub mod error;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::error;

use crate::config::CONFIG;
use crate::state::AppState;
use error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            CONFIG.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let user_input = request.user_input.trim();
    if user_input.is_empty() {
        return Err(ApiError::bad_request("user_input must be a non-empty string"));
    }

    if !state.ready() {
        return Err(ApiError::unavailable(
            "backends are still warming up",
            CONFIG.warmup_retry_secs,
        ));
    }

    let conversation = state.orchestrator.run(user_input).await.map_err(|e| {
        // Full detail stays in the logs; the caller sees a generic failure.
        error!("chat run failed: {e}");
        ApiError::internal("internal error")
    })?;

    let response = conversation
        .final_answer()
        .ok_or_else(|| {
            error!("run terminated without an assistant message");
            ApiError::internal("internal error")
        })?
        .to_string();

    Ok(Json(ChatResponse { response }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "ready": state.ready(),
    }))
}
