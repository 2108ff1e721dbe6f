use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::planner::ItineraryPlanner;

/// The full application: itinerary API plus static pages.
///
/// There is no overall request deadline: each outbound call is bounded by the
/// HTTP client timeout and always degrades to fallback text, so a validated
/// request runs to completion and answers 200.
pub fn app(server: &ServerConfig, planner: ItineraryPlanner) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState::new(Arc::new(planner), server.max_days);

    Router::new()
        .merge(api::router(state))
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(DefaultBodyLimit::max(server.body_limit_bytes)),
        )
}

pub async fn run(server: &ServerConfig, planner: ItineraryPlanner) -> Result<()> {
    let app = app(server, planner);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", server.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
