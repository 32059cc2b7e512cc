//! AI priority assessment (preferred path).
//!
//! One prompt, one request, no retries. Anything short of a well-formed
//! verdict becomes [`AiUnavailable`] and the caller falls back to rules.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ai_llm_service::ChatModel;
use tracing::{debug, info, warn};

use crate::errors::AiUnavailable;
use crate::model::{IssueContext, PriorityAssessment, PriorityLevel};
use crate::prompt::{TRIAGE_SYSTEM_PROMPT, build_triage_prompt};
use crate::verdict::{AiVerdict, parse_verdict};

pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(15);

/// Asks the configured model for a verdict.
#[derive(Clone)]
pub struct AiAssessor {
    model: Option<Arc<dyn ChatModel>>,
    timeout: Duration,
}

impl AiAssessor {
    pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self {
            model: Some(model),
            timeout,
        }
    }

    /// No provider configured: every call is `NotConfigured` without I/O.
    pub fn disabled() -> Self {
        Self {
            model: None,
            timeout: DEFAULT_AI_TIMEOUT,
        }
    }

    /// Wraps an optional model, as returned by provider selection.
    pub fn from_model(model: Option<Arc<dyn ChatModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// # Errors
    /// [`AiUnavailable`] when no model is configured, the call fails or
    /// times out, or the reply holds no valid verdict.
    pub async fn assess(&self, ctx: &IssueContext) -> Result<PriorityAssessment, AiUnavailable> {
        let model = self.model.as_ref().ok_or(AiUnavailable::NotConfigured)?;
        let prompt = build_triage_prompt(ctx);
        let started = Instant::now();

        debug!(
            provider = %model.provider(),
            model = %model.model(),
            prompt_len = prompt.len(),
            "requesting AI triage"
        );

        let reply = tokio::time::timeout(
            self.timeout,
            model.generate(&prompt, Some(TRIAGE_SYSTEM_PROMPT)),
        )
        .await
        .map_err(|_| AiUnavailable::Timeout(self.timeout))?
        .map_err(|e| AiUnavailable::Provider(e.to_string()))?;

        let verdict = parse_verdict(&reply)?;
        let assessment = into_assessment(verdict, ctx.similar_issues_count);

        info!(
            provider = %model.provider(),
            score = assessment.score(),
            level = %assessment.level(),
            latency_ms = started.elapsed().as_millis(),
            "AI triage completed"
        );

        Ok(assessment)
    }
}

impl std::fmt::Debug for AiAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiAssessor")
            .field("model", &self.model.as_ref().map(|m| m.model().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Turns a validated verdict into an assessment. The level always comes
/// from the score; a disagreeing model label is only logged.
fn into_assessment(v: AiVerdict, similar_issues_count: u32) -> PriorityAssessment {
    let derived = PriorityLevel::from_score(v.score);
    if derived != v.priority {
        warn!(
            score = v.score,
            model_priority = %v.priority,
            derived_priority = %derived,
            "AI priority disagrees with its score; using the score"
        );
    }

    let mut factors = vec![
        format!("AI Analysis: {}", v.reasoning),
        format!("Safety Risk: {}", v.safety_risk),
        format!("Urgency: {}", v.urgency_level),
        format!("Impact: {}", v.impact_assessment),
    ];
    if similar_issues_count > 0 {
        factors.push(format!("{similar_issues_count} similar issue(s) in area"));
    }

    PriorityAssessment::ai_assessed(v.score, factors, v.reasoning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssessmentSource, GeoPoint};
    use ai_llm_service::{AiLlmError, LlmProvider, ProviderError, ProviderErrorKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: Result<String, ()>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatModel for Canned {
        fn provider(&self) -> LlmProvider {
            LlmProvider::Gemini
        }

        fn model(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
            assert_eq!(system, Some(TRIAGE_SYSTEM_PROMPT));
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.clone().map_err(|_| {
                ProviderError::new(LlmProvider::Gemini, ProviderErrorKind::EmptyChoices).into()
            })
        }
    }

    fn ctx(similar: u32) -> IssueContext {
        IssueContext::new(
            "Roads",
            "Pothole",
            "Large pothole on main road",
            GeoPoint::new(77.59, 12.97),
        )
        .with_similar_issues(similar)
    }

    const VERDICT: &str = r#"{"priority":"High","score":78,"reasoning":"Traffic hazard",
        "safetyRisk":"High","urgencyLevel":"Within 24h","impactAssessment":"Commuters"}"#;

    #[tokio::test]
    async fn verdict_becomes_ai_assessment() {
        let model = Canned::ok(VERDICT);
        let a = AiAssessor::new(model.clone(), DEFAULT_AI_TIMEOUT)
            .assess(&ctx(2))
            .await
            .unwrap();
        assert_eq!(a.score(), 78);
        assert_eq!(a.level(), PriorityLevel::High);
        assert_eq!(a.source(), AssessmentSource::AiAssessed);
        assert_eq!(a.ai_analysis(), Some("Traffic hazard"));
        assert_eq!(
            a.factors(),
            &[
                "AI Analysis: Traffic hazard".to_string(),
                "Safety Risk: High".to_string(),
                "Urgency: Within 24h".to_string(),
                "Impact: Commuters".to_string(),
                "2 similar issue(s) in area".to_string(),
            ]
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn level_is_derived_from_score() {
        let text = VERDICT.replace("\"High\",\"score\":78", "\"Low\",\"score\":90");
        let a = AiAssessor::new(Canned::ok(&text), DEFAULT_AI_TIMEOUT)
            .assess(&ctx(0))
            .await
            .unwrap();
        assert_eq!(a.level(), PriorityLevel::Critical);
        assert_eq!(a.factors().len(), 4);
    }

    #[tokio::test]
    async fn disabled_makes_no_call() {
        let err = AiAssessor::disabled().assess(&ctx(0)).await.unwrap_err();
        assert!(matches!(err, AiUnavailable::NotConfigured));
    }

    #[tokio::test]
    async fn provider_error_is_unavailable() {
        let model = Arc::new(Canned {
            reply: Err(()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        });
        let err = AiAssessor::new(model, DEFAULT_AI_TIMEOUT)
            .assess(&ctx(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AiUnavailable::Provider(_)));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let model = Arc::new(Canned {
            reply: Ok(VERDICT.into()),
            delay: Duration::from_millis(200),
            calls: AtomicUsize::new(0),
        });
        let err = AiAssessor::new(model, Duration::from_millis(20))
            .assess(&ctx(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AiUnavailable::Timeout(_)));
    }

    #[tokio::test]
    async fn prose_reply_is_malformed() {
        let err = AiAssessor::new(Canned::ok("This looks urgent."), DEFAULT_AI_TIMEOUT)
            .assess(&ctx(0))
            .await
            .unwrap_err();
        assert!(matches!(err, AiUnavailable::Malformed(_)));
    }
}
