//! Unified error types for the crate.

use issue_triage::FinderError;
use thiserror::Error;

/// Top-level error for geo-issue-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// JSON conversion of a payload failed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Record rejected before it reached the store.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl From<StoreError> for FinderError {
    fn from(e: StoreError) -> Self {
        FinderError::Backend(e.to_string())
    }
}
