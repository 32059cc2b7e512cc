//! HTTP surface for the civic issue triage engine.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::{env, sync::Arc};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        health::health_route::health_route, photos::photo_route::photo_route,
        triage::triage_route::triage_route,
    },
};

/// Routes with the JSON rejection mapper applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/triage", post(triage_route))
        .route("/triage/photos", post(photo_route))
        .route("/health", get(health_route))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env().await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "triage api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Resolves on Ctrl+C. If the handler cannot be installed, waits forever.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
