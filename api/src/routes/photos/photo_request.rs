use issue_triage::PhotoAnalysis;
use serde::{Deserialize, Serialize};

/// Request body for `POST /triage/photos`.
#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    /// Photo URLs; only the first one is analyzed.
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    /// `null` when no vision provider is configured or the analysis failed.
    pub analysis: Option<PhotoAnalysis>,
}
