// tests/http_chat.rs
// Router-level tests: request validation, readiness gating, and the chat
// round trip, all against scripted backends.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{ScriptedCompletions, ScriptedSearch, StaticSafety};
use triad::api;
use triad::state::AppState;

fn test_state(llm: ScriptedCompletions, safety: StaticSafety, search: ScriptedSearch) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(llm),
        Arc::new(safety),
        Arc::new(search),
        8,
    ))
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn chat_round_trip() {
    let state = test_state(
        ScriptedCompletions::new(&["4", "false"]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    state.mark_ready();
    let app = api::routes(state);

    let response = app
        .oneshot(chat_request(&json!({"user_input": "What is 2+2?"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["response"], "4");
}

#[tokio::test]
async fn empty_input_is_a_bad_request() {
    let state = test_state(
        ScriptedCompletions::new(&[]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    state.mark_ready();
    let app = api::routes(state);

    let response = app
        .oneshot(chat_request(&json!({"user_input": "   "}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let state = test_state(
        ScriptedCompletions::new(&[]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    state.mark_ready();
    let app = api::routes(state);

    let response = app.oneshot(chat_request("{not:json")).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn requests_before_readiness_are_rejected_retryably() {
    let state = test_state(
        ScriptedCompletions::new(&["never reached"]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    // No mark_ready: warmup has not finished
    let app = api::routes(state);

    let response = app
        .oneshot(chat_request(&json!({"user_input": "hello"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn backend_failure_is_a_generic_internal_error() {
    let state = test_state(
        // Empty script: the answering completion fails
        ScriptedCompletions::new(&[]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    state.mark_ready();
    let app = api::routes(state);

    let response = app
        .oneshot(chat_request(&json!({"user_input": "hello"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    // No backend detail leaks to the caller
    assert_eq!(body["message"], "internal error");
}

#[tokio::test]
async fn health_reports_readiness() {
    let state = test_state(
        ScriptedCompletions::new(&[]),
        StaticSafety::safe(),
        ScriptedSearch::snippets(&[]),
    );
    let app = api::routes(Arc::clone(&state));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ready"], false);

    state.mark_ready();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["ready"], true);
}
