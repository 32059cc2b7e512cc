//! Value types flowing through the triage engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidInput;

/// WGS-84 point. Field order mirrors GeoJSON: longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `true` when both coordinates are finite and inside WGS-84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// GeoJSON `coordinates` array: `[longitude, latitude]`.
    pub fn to_geojson(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn from_geojson(coordinates: [f64; 2]) -> Self {
        Self {
            lon: coordinates[0],
            lat: coordinates[1],
        }
    }
}

/// A freshly submitted report, before the duplicate lookup ran.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueReport {
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub photo_refs: Vec<String>,
}

impl IssueReport {
    /// Rejects reports that cannot be triaged.
    ///
    /// # Errors
    /// [`InvalidInput::MissingField`] for a blank category/title/description,
    /// [`InvalidInput::InvalidLocation`] for unusable coordinates.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        for (name, value) in [
            ("category", &self.category),
            ("title", &self.title),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(InvalidInput::MissingField(name));
            }
        }
        if !self.location.is_valid() {
            return Err(InvalidInput::InvalidLocation {
                lon: self.location.lon,
                lat: self.location.lat,
            });
        }
        Ok(())
    }

    /// Binds the report to a duplicate count, producing the scoring input.
    pub fn into_context(self, similar_issues_count: u32) -> IssueContext {
        IssueContext {
            category: self.category,
            title: self.title,
            description: self.description,
            location: self.location,
            similar_issues_count,
            photo_refs: self.photo_refs,
        }
    }
}

/// Input of one evaluation. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueContext {
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: GeoPoint,
    pub similar_issues_count: u32,
    pub photo_refs: Vec<String>,
}

impl IssueContext {
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            description: description.into(),
            location,
            similar_issues_count: 0,
            photo_refs: Vec::new(),
        }
    }

    pub fn with_similar_issues(mut self, count: u32) -> Self {
        self.similar_issues_count = count;
        self
    }

    pub fn with_photos(mut self, photo_refs: Vec<String>) -> Self {
        self.photo_refs = photo_refs;
        self
    }

    /// Lowercased `title + " " + description`, the text keyword tiers scan.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Priority used to order authority response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    /// Threshold mapping shared by every path.
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => PriorityLevel::Critical,
            70..=84 => PriorityLevel::High,
            50..=69 => PriorityLevel::Medium,
            _ => PriorityLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PriorityLevel::Low),
            "medium" => Ok(PriorityLevel::Medium),
            "high" => Ok(PriorityLevel::High),
            "critical" => Ok(PriorityLevel::Critical),
            other => Err(format!("unknown priority level `{other}`")),
        }
    }
}

/// Which path produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssessmentSource {
    RuleBased,
    #[serde(rename = "AIAssessed")]
    AiAssessed,
}

/// Terminal triage result for one report.
///
/// Fields are private so that `level` can only come from
/// [`PriorityLevel::from_score`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAssessment {
    score: u8,
    level: PriorityLevel,
    factors: Vec<String>,
    source: AssessmentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    ai_analysis: Option<String>,
}

impl PriorityAssessment {
    /// Scores above 100 are clamped.
    pub fn rule_based(score: u8, factors: Vec<String>) -> Self {
        let score = score.min(100);
        Self {
            score,
            level: PriorityLevel::from_score(score),
            factors,
            source: AssessmentSource::RuleBased,
            ai_analysis: None,
        }
    }

    /// Scores above 100 are clamped.
    pub fn ai_assessed(score: u8, factors: Vec<String>, analysis: impl Into<String>) -> Self {
        let score = score.min(100);
        Self {
            score,
            level: PriorityLevel::from_score(score),
            factors,
            source: AssessmentSource::AiAssessed,
            ai_analysis: Some(analysis.into()),
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn level(&self) -> PriorityLevel {
        self.level
    }

    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    pub fn source(&self) -> AssessmentSource {
        self.source
    }

    pub fn ai_analysis(&self) -> Option<&str> {
        self.ai_analysis.as_deref()
    }
}

/// Outcome of the fallback chain. Callers match on the variant instead of
/// null-checking an optional AI result.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageOutcome {
    AiAssessed(PriorityAssessment),
    RuleBased(PriorityAssessment),
}

impl TriageOutcome {
    pub fn assessment(&self) -> &PriorityAssessment {
        match self {
            TriageOutcome::AiAssessed(a) | TriageOutcome::RuleBased(a) => a,
        }
    }

    pub fn into_assessment(self) -> PriorityAssessment {
        match self {
            TriageOutcome::AiAssessed(a) | TriageOutcome::RuleBased(a) => a,
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, TriageOutcome::AiAssessed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> IssueReport {
        IssueReport {
            category: "Water Supply".into(),
            title: "Pipe burst".into(),
            description: "Water everywhere".into(),
            location: GeoPoint::new(77.59, 12.97),
            photo_refs: vec![],
        }
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(PriorityLevel::from_score(100), PriorityLevel::Critical);
        assert_eq!(PriorityLevel::from_score(85), PriorityLevel::Critical);
        assert_eq!(PriorityLevel::from_score(84), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(70), PriorityLevel::High);
        assert_eq!(PriorityLevel::from_score(69), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(50), PriorityLevel::Medium);
        assert_eq!(PriorityLevel::from_score(49), PriorityLevel::Low);
        assert_eq!(PriorityLevel::from_score(0), PriorityLevel::Low);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("critical".parse::<PriorityLevel>(), Ok(PriorityLevel::Critical));
        assert_eq!(" High ".parse::<PriorityLevel>(), Ok(PriorityLevel::High));
        assert!("urgent".parse::<PriorityLevel>().is_err());
    }

    #[test]
    fn assessment_level_follows_score() {
        let a = PriorityAssessment::ai_assessed(40, vec![], "minor");
        assert_eq!(a.level(), PriorityLevel::Low);
        assert_eq!(a.source(), AssessmentSource::AiAssessed);
        assert_eq!(a.ai_analysis(), Some("minor"));

        let r = PriorityAssessment::rule_based(250, vec![]);
        assert_eq!(r.score(), 100);
        assert_eq!(r.level(), PriorityLevel::Critical);
        assert!(r.ai_analysis().is_none());
    }

    #[test]
    fn assessment_serializes_source_tag() {
        let a = PriorityAssessment::ai_assessed(90, vec!["x".into()], "y");
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["source"], "AIAssessed");
        assert_eq!(v["level"], "Critical");
        assert_eq!(v["aiAnalysis"], "y");

        let r = serde_json::to_value(PriorityAssessment::rule_based(10, vec![])).unwrap();
        assert_eq!(r["source"], "RuleBased");
        assert!(r.get("aiAnalysis").is_none());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let mut r = report();
        r.title = "   ".into();
        assert_eq!(r.validate(), Err(InvalidInput::MissingField("title")));

        let mut r = report();
        r.category = String::new();
        assert_eq!(r.validate(), Err(InvalidInput::MissingField("category")));
    }

    #[test]
    fn validate_rejects_bad_location() {
        let mut r = report();
        r.location = GeoPoint::new(12.97, 190.0);
        assert!(matches!(
            r.validate(),
            Err(InvalidInput::InvalidLocation { .. })
        ));

        let mut r = report();
        r.location = GeoPoint::new(f64::NAN, 0.0);
        assert!(r.validate().is_err());

        assert!(report().validate().is_ok());
    }

    #[test]
    fn geojson_order_is_lon_lat() {
        let p = GeoPoint::new(77.59, 12.97);
        assert_eq!(p.to_geojson(), [77.59, 12.97]);
        assert_eq!(GeoPoint::from_geojson([77.59, 12.97]), p);
    }

    #[test]
    fn outcome_exposes_inner_assessment() {
        let a = PriorityAssessment::rule_based(55, vec![]);
        let o = TriageOutcome::RuleBased(a.clone());
        assert!(!o.is_ai());
        assert_eq!(o.assessment(), &a);
        assert_eq!(o.into_assessment(), a);
    }
}
