use geo_issue_store::GeoJsonPoint;
use issue_triage::IssueReport;
use serde::Deserialize;

/// Request body for `POST /triage`.
#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    /// One of the civic categories; unknown values get the default base score.
    pub category: String,
    pub title: String,
    pub description: String,
    /// GeoJSON point, `coordinates` = `[longitude, latitude]`.
    pub location: GeoJsonPoint,
    /// Photo URLs attached to the report.
    #[serde(default)]
    pub photos: Vec<String>,
}

impl TriageRequest {
    pub fn into_report(self) -> IssueReport {
        IssueReport {
            category: self.category,
            title: self.title,
            description: self.description,
            location: self.location.into(),
            photo_refs: self.photos,
        }
    }
}
