use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use issue_triage::{InvalidInput, TriageError};
use thiserror::Error;

use crate::core::{
    app_state::ConfigError,
    http::response_envelope::{Envelope, FieldIssue},
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid issue report: {0}")]
    InvalidInput(#[from] InvalidInput),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // startup-only
            AppError::MissingEnv(_)
            | AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    fn details(&self) -> Vec<FieldIssue> {
        match self {
            AppError::InvalidInput(InvalidInput::MissingField(field)) => {
                vec![FieldIssue::at(*field, "Must be a non-empty string.")]
            }
            AppError::InvalidInput(InvalidInput::InvalidLocation { .. }) => vec![FieldIssue::at(
                "location.coordinates",
                "Expected [longitude, latitude] within WGS-84 bounds.",
            )],
            _ => Vec::new(),
        }
    }
}

impl From<TriageError> for AppError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::InvalidInput(e) => AppError::InvalidInput(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        Envelope::failure(self.error_code(), self.to_string())
            .with_details(self.details())
            .respond(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_400_with_field_path() {
        let err = AppError::from(TriageError::from(InvalidInput::MissingField("title")));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.details()[0].path.as_deref(), Some("title"));
    }

    #[test]
    fn startup_errors_are_server_side() {
        let err = AppError::MissingEnv("API_ADDRESS");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.details().is_empty());
        assert_eq!(
            err.to_string(),
            "missing required environment variable: API_ADDRESS"
        );
    }

    #[test]
    fn bad_location_points_at_coordinates() {
        let err = AppError::InvalidInput(InvalidInput::InvalidLocation {
            lon: 200.0,
            lat: 0.0,
        });
        assert_eq!(
            err.details()[0].path.as_deref(),
            Some("location.coordinates")
        );
    }
}
