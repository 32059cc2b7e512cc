use std::sync::Arc;

use ai_llm_service::{AiLlmError, HealthService, LlmProviders};
use geo_issue_store::{GeoStoreConfig, IssueStore, StoreError};
use issue_triage::{AiAssessor, PhotoAnalyzer, RuleClassifier, TriageConfig, TriageEngine};
use thiserror::Error;
use tracing::{info, warn};

/// Startup failures while assembling [`AppState`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// AI → rules triage chain, with the store as duplicate finder.
    pub engine: Arc<TriageEngine>,
    /// Advisory photo signal (OpenAI only).
    pub photos: PhotoAnalyzer,
    /// Where triaged issues are recorded.
    pub store: IssueStore,
    /// Configured providers, for `/health`.
    pub providers: LlmProviders,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// Missing AI keys or a missing `QDRANT_URL` are not errors; they select
    /// the rule-based path and the in-memory store respectively.
    pub async fn from_env() -> Result<Self, ConfigError> {
        let providers = LlmProviders::from_env()?;
        let triage = TriageConfig::from_env()?;
        let store = IssueStore::from_config(GeoStoreConfig::from_env()?, triage.similar.since)?;

        if let Err(e) = store.ensure_schema().await {
            // The engine treats lookup failures as "no duplicates", so keep serving.
            warn!(error = %e, "issue store schema setup failed");
        }
        info!(store = store.kind(), "issue store ready");

        Self::assemble(providers, triage, store)
    }

    /// Wires the engine from already loaded parts.
    pub fn assemble(
        providers: LlmProviders,
        triage: TriageConfig,
        store: IssueStore,
    ) -> Result<Self, ConfigError> {
        let assessor = AiAssessor::from_model(providers.chat_model()?, triage.ai_timeout);
        let engine = TriageEngine::new(RuleClassifier::default(), assessor)
            .with_finder(store.finder())
            .with_similar_policy(triage.similar);
        let photos = PhotoAnalyzer::new(providers.vision_model()?, triage.ai_timeout);

        Ok(Self {
            engine: Arc::new(engine),
            photos,
            store,
            providers,
            health: Arc::new(HealthService::new(Some(5))?),
        })
    }
}
