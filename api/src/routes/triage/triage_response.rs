use issue_triage::PriorityAssessment;
use serde::Serialize;

/// Response body for `POST /triage`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResponse {
    /// Id under which the report was recorded; absent if recording failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
    pub assessment: PriorityAssessment,
}
