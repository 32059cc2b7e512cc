//! Priority decision: try AI once, otherwise classify by rules.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::ai_assessor::AiAssessor;
use crate::classifier::RuleClassifier;
use crate::errors::{AiUnavailable, FinderError, TriageResult};
use crate::model::{IssueContext, IssueReport, TriageOutcome};
use crate::similar::{
    DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE_METERS, DEFAULT_SINCE, SimilarIssueFinder,
    SimilarIssueQuery,
};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// How the duplicate lookup is parameterized.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarPolicy {
    pub max_distance_meters: f64,
    pub since: Duration,
    pub limit: u32,
    pub timeout: Duration,
}

impl Default for SimilarPolicy {
    fn default() -> Self {
        Self {
            max_distance_meters: DEFAULT_MAX_DISTANCE_METERS,
            since: DEFAULT_SINCE,
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Stateless triage engine; share it behind an `Arc`.
#[derive(Clone)]
pub struct TriageEngine {
    classifier: RuleClassifier,
    assessor: AiAssessor,
    finder: Option<Arc<dyn SimilarIssueFinder>>,
    similar: SimilarPolicy,
}

impl TriageEngine {
    pub fn new(classifier: RuleClassifier, assessor: AiAssessor) -> Self {
        Self {
            classifier,
            assessor,
            finder: None,
            similar: SimilarPolicy::default(),
        }
    }

    /// Rule-based only, no duplicate lookup.
    pub fn rules_only() -> Self {
        Self::new(RuleClassifier::default(), AiAssessor::disabled())
    }

    pub fn with_finder(mut self, finder: Arc<dyn SimilarIssueFinder>) -> Self {
        self.finder = Some(finder);
        self
    }

    pub fn with_similar_policy(mut self, policy: SimilarPolicy) -> Self {
        self.similar = policy;
        self
    }

    pub fn classifier(&self) -> &RuleClassifier {
        &self.classifier
    }

    /// Validates a new report, counts nearby duplicates, then assesses it.
    ///
    /// # Errors
    /// [`crate::TriageError::InvalidInput`] when the report is malformed.
    /// Provider and store failures never surface here.
    #[instrument(skip_all, fields(category = %report.category))]
    pub async fn evaluate(&self, report: IssueReport) -> TriageResult<TriageOutcome> {
        report.validate()?;
        let count = self.similar_issue_count(&report).await;
        let ctx = report.into_context(count);
        Ok(self.assess(&ctx).await)
    }

    /// Runs the AI → rules chain on an already built context.
    pub async fn assess(&self, ctx: &IssueContext) -> TriageOutcome {
        let started = Instant::now();
        match self.assessor.assess(ctx).await {
            Ok(a) => TriageOutcome::AiAssessed(a),
            Err(reason) => {
                log_fallback(&reason);
                let a = self.classifier.classify(ctx);
                info!(
                    score = a.score(),
                    level = %a.level(),
                    latency_ms = started.elapsed().as_millis(),
                    "rule-based triage completed"
                );
                TriageOutcome::RuleBased(a)
            }
        }
    }

    /// Same-category issues near the report. `0` when no finder is set or
    /// the lookup fails or times out. Never above the policy limit.
    pub async fn similar_issue_count(&self, report: &IssueReport) -> u32 {
        let Some(finder) = &self.finder else {
            return 0;
        };

        let query = SimilarIssueQuery {
            category: report.category.clone(),
            point: report.location,
            max_distance_meters: self.similar.max_distance_meters,
            since: self.similar.since,
            limit: self.similar.limit,
        };

        let found = tokio::time::timeout(self.similar.timeout, finder.find_similar(&query))
            .await
            .unwrap_or(Err(FinderError::Timeout(self.similar.timeout)));

        match found {
            Ok(s) => {
                let count = s.count.min(query.limit);
                debug!(count, "similar issues found");
                count
            }
            Err(e) => {
                warn!(error = %e, "similar-issue lookup failed; assuming none");
                0
            }
        }
    }
}

impl std::fmt::Debug for TriageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageEngine")
            .field("classifier", &self.classifier)
            .field("assessor", &self.assessor)
            .field("finder", &self.finder.is_some())
            .field("similar", &self.similar)
            .finish()
    }
}

fn log_fallback(reason: &AiUnavailable) {
    match reason {
        AiUnavailable::NotConfigured => debug!("AI not configured; using rules"),
        other => warn!(reason = %other, "AI assessment unavailable; falling back to rules"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssessmentSource, GeoPoint};
    use crate::similar::SimilarIssues;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Fixed {
        result: Result<u32, ()>,
        delay: Duration,
        queries: Mutex<Vec<SimilarIssueQuery>>,
    }

    impl Fixed {
        fn new(result: Result<u32, ()>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                result,
                delay,
                queries: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl SimilarIssueFinder for Fixed {
        async fn find_similar(
            &self,
            query: &SimilarIssueQuery,
        ) -> Result<SimilarIssues, FinderError> {
            self.queries.lock().unwrap().push(query.clone());
            tokio::time::sleep(self.delay).await;
            match self.result {
                Ok(n) => Ok(SimilarIssues {
                    count: n,
                    issue_ids: vec![],
                }),
                Err(()) => Err(FinderError::Backend("down".into())),
            }
        }
    }

    fn report() -> IssueReport {
        IssueReport {
            category: "Parks & Recreation".into(),
            title: "broken bench".into(),
            description: "needs repair".into(),
            location: GeoPoint::new(77.59, 12.97),
            photo_refs: vec![],
        }
    }

    #[tokio::test]
    async fn finder_count_feeds_rules() {
        let finder = Fixed::new(Ok(3), Duration::ZERO);
        let engine = TriageEngine::rules_only().with_finder(finder.clone());
        let out = engine.evaluate(report()).await.unwrap();
        assert!(!out.is_ai());
        assert_eq!(out.assessment().score(), 66);

        let q = finder.queries.lock().unwrap()[0].clone();
        assert_eq!(q.category, "Parks & Recreation");
        assert_eq!(q.point, GeoPoint::new(77.59, 12.97));
        assert_eq!(q.max_distance_meters, 5_000.0);
        assert_eq!(q.limit, 10);
    }

    #[tokio::test]
    async fn finder_count_is_capped_at_limit() {
        let engine = TriageEngine::rules_only().with_finder(Fixed::new(Ok(50), Duration::ZERO));
        assert_eq!(engine.similar_issue_count(&report()).await, 10);
    }

    #[tokio::test]
    async fn finder_failure_counts_zero() {
        let engine = TriageEngine::rules_only().with_finder(Fixed::new(Err(()), Duration::ZERO));
        let out = engine.evaluate(report()).await.unwrap();
        assert_eq!(out.assessment().score(), 60);
        assert_eq!(out.assessment().source(), AssessmentSource::RuleBased);
    }

    #[tokio::test]
    async fn finder_timeout_counts_zero() {
        let engine = TriageEngine::rules_only()
            .with_finder(Fixed::new(Ok(5), Duration::from_millis(200)))
            .with_similar_policy(SimilarPolicy {
                timeout: Duration::from_millis(20),
                ..SimilarPolicy::default()
            });
        assert_eq!(engine.similar_issue_count(&report()).await, 0);
    }

    #[tokio::test]
    async fn invalid_report_is_rejected_before_lookup() {
        let finder = Fixed::new(Ok(1), Duration::ZERO);
        let engine = TriageEngine::rules_only().with_finder(finder.clone());
        let mut bad = report();
        bad.description = " ".into();
        assert!(engine.evaluate(bad).await.is_err());
        assert!(finder.queries.lock().unwrap().is_empty());
    }
}
