//! API routes.
//!
//! The transport layer is deliberately thin: it parses the request body,
//! rejects the two client errors (empty topic key, empty question), and
//! hands everything else to the pipeline. Degraded outcomes (unknown topic,
//! extraction or composition failure) are valid 200 responses carrying a
//! guardrail tag, never transport errors.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use quotegate_runtime::{AnswerRequest, Outcome};

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

pub fn answer_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/answer", post(answer))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn answer(
    State(state): State<AppStateArc>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<Outcome>, (StatusCode, String)> {
    tracing::info!(topic = %request.topic_key, "answer request");

    state
        .pipeline
        .answer(request)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    topics: usize,
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        topics: state.pipeline.topics().len(),
    })
}
