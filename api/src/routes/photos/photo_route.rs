use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::Response,
};
use tracing::{debug, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::Envelope},
    error_handler::{AppError, AppResult},
    routes::photos::photo_request::{PhotoRequest, PhotoResponse},
};

/// Advisory photo analysis. Never influences the triage score.
#[instrument(name = "photo_route", skip_all, fields(photos = body.photos.len()))]
pub async fn photo_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PhotoRequest>,
) -> AppResult<Response> {
    let photos: Vec<String> = body
        .photos
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    if photos.is_empty() {
        return Err(AppError::BadRequest(
            "`photos` must contain at least one URL".into(),
        ));
    }

    if !state.photos.is_configured() {
        debug!("no vision provider configured");
    }
    let analysis = state.photos.analyze(&photos).await;

    Ok(Envelope::ok(PhotoResponse { analysis })
        .respond(StatusCode::OK))
}
