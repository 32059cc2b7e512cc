use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use geo_issue_store::IssueRecord;
use issue_triage::IssueReport;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::Envelope},
    error_handler::AppResult,
    routes::triage::{triage_request::TriageRequest, triage_response::TriageResponse},
};

/// HTTP endpoint that triages a new civic issue report.
///
/// The report is validated and scored (AI first, rules as fallback), then
/// recorded so later reports nearby count it as a duplicate. A failed write
/// does not fail the request.
#[instrument(name = "triage_route", skip_all, fields(category = %body.category))]
pub async fn triage_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TriageRequest>,
) -> AppResult<Response> {
    let report = body.into_report();
    let outcome = state.engine.evaluate(report.clone()).await?;

    let issue_id = record_issue(&state, &report).await;
    let assessment = outcome.into_assessment();

    info!(
        score = assessment.score(),
        level = %assessment.level(),
        source = ?assessment.source(),
        "issue triaged"
    );

    Ok(Envelope::ok(TriageResponse {
        issue_id,
        assessment,
    })
    .respond(StatusCode::OK))
}

async fn record_issue(state: &AppState, report: &IssueReport) -> Option<String> {
    let id = Uuid::new_v4().to_string();
    let record = IssueRecord::new(
        id.clone(),
        report.category.clone(),
        report.title.clone(),
        report.location,
        Utc::now(),
    );

    match state.store.record(record).await {
        Ok(()) => Some(id),
        Err(e) => {
            warn!(store = state.store.kind(), error = %e, "failed to record triaged issue");
            None
        }
    }
}
