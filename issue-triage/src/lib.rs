//! Civic issue triage engine.
//!
//! Turns a citizen report into a [`PriorityAssessment`]: an AI verdict when a
//! provider is configured and answers sensibly, otherwise a deterministic
//! rule-based score. Nearby same-category reports (via a
//! [`SimilarIssueFinder`]) raise the score on both paths.

pub mod ai_assessor;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod keywords;
pub mod model;
pub mod orchestrator;
pub mod photo_signal;
pub mod prompt;
pub mod severity_table;
pub mod similar;
pub mod verdict;

pub use ai_assessor::AiAssessor;
pub use classifier::RuleClassifier;
pub use config::TriageConfig;
pub use errors::{AiUnavailable, FinderError, InvalidInput, TriageError, TriageResult, VerdictError};
pub use keywords::{KeywordTier, KeywordTiers};
pub use model::{
    AssessmentSource, GeoPoint, IssueContext, IssueReport, PriorityAssessment, PriorityLevel,
    TriageOutcome,
};
pub use orchestrator::{SimilarPolicy, TriageEngine};
pub use photo_signal::{PhotoAnalysis, PhotoAnalyzer};
pub use severity_table::SeverityTable;
pub use similar::{
    DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE_METERS, DEFAULT_SINCE, SimilarIssueFinder, SimilarIssueQuery,
    SimilarIssues,
};
