//! HTTP server wiring.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use quotegate_runtime::AnswerPipeline;

use crate::routes;

/// Application state shared across handlers.
///
/// The pipeline holds no cross-request state, so one instance serves all
/// concurrent requests without coordination.
pub struct AppState {
    pub pipeline: AnswerPipeline,
}

impl AppState {
    pub fn new(pipeline: AnswerPipeline) -> Self {
        Self { pipeline }
    }
}

/// Build the router with all routes and layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::answer_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
