use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::instrument;

use crate::core::{app_state::AppState, http::response_envelope::Envelope};

/// Liveness plus a probe of every configured AI provider.
///
/// Always `200`: an unreachable provider only means triage runs on rules.
#[instrument(name = "health_route", skip_all)]
pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let ai_providers = state
        .health
        .check_many(&state.providers.configured())
        .await;

    let triage_mode = if ai_providers.iter().any(|s| s.ok) {
        "ai"
    } else {
        "rules"
    };

    Envelope::ok(HealthResponse {
        status: "ok",
        triage_mode,
        store: state.store.kind(),
        photo_analysis: state.photos.is_configured(),
        ai_providers,
    })
    .respond(StatusCode::OK)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// `ai` when at least one provider answered the probe.
    pub triage_mode: &'static str,
    pub store: &'static str,
    pub photo_analysis: bool,
    pub ai_providers: Vec<HealthStatus>,
}
