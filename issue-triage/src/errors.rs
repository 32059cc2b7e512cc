//! Error types for the triage engine.
//!
//! Only [`TriageError::InvalidInput`] ever reaches the caller of
//! [`crate::TriageEngine::evaluate`]. Provider and store failures are modelled
//! here too, but they are absorbed by the orchestrator and turned into the
//! rule-based fallback (AI) or a zero duplicate count (store).

use std::time::Duration;

use thiserror::Error;

/// Result alias for caller-facing triage operations.
pub type TriageResult<T> = Result<T, TriageError>;

/// Caller-facing error. Once the report is well-formed, triage never fails.
#[derive(Debug, Error)]
pub enum TriageError {
    /// The report was rejected before any scoring attempt.
    #[error("[Issue Triage] invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Why a report was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// A required text field is empty or whitespace.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// Coordinates are not finite or outside WGS-84 bounds.
    #[error("location out of range: lon={lon}, lat={lat}")]
    InvalidLocation { lon: f64, lat: f64 },
}

/// Failure reported by a [`crate::SimilarIssueFinder`] implementation.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The underlying store failed (connection, query, decoding).
    #[error("[Issue Triage] similar-issue store error: {0}")]
    Backend(String),

    /// The query did not complete within the configured budget.
    #[error("[Issue Triage] similar-issue query timed out after {0:?}")]
    Timeout(Duration),
}

/// Reasons the AI path produced no assessment.
///
/// Every variant leads to the same outcome (rule-based fallback); the
/// distinction only matters for logs.
#[derive(Debug, Error)]
pub enum AiUnavailable {
    /// No provider credential is configured; no request was made.
    #[error("no AI provider configured")]
    NotConfigured,

    /// Transport failure or non-success status from the provider.
    #[error("provider call failed: {0}")]
    Provider(String),

    /// The provider call exceeded the outer timeout.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    /// The response held no usable verdict.
    #[error("malformed verdict: {0}")]
    Malformed(#[from] VerdictError),
}

/// Problems found while reading a model verdict out of free text.
#[derive(Debug, Error)]
pub enum VerdictError {
    /// No `{...}` block in the text parsed as a JSON object.
    #[error("no JSON object found in response")]
    NoJsonObject,

    /// A JSON object was found but does not match the verdict schema.
    #[error("schema mismatch: {0}")]
    Schema(String),
}
