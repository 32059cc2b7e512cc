//! Env-driven provider selection.
//!
//! Gemini is the primary provider and OpenAI the secondary one. Exactly one
//! provider is chosen per triage: the first configured. Photo analysis
//! always goes to OpenAI, since it is the only provider wired for images.
//!
//! Construct once at startup and share the resulting `Arc<dyn ChatModel>`
//! handles; each holds its own pooled HTTP client.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    chat_model::ChatModel,
    config::{
        default_config::{config_gemini_from, config_openai_from},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{Lookup, Result, process_env},
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// Resolved provider configs, in preference order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmProviders {
    /// Gemini, when `GEMINI_API_KEY` is set.
    pub primary: Option<LlmModelConfig>,
    /// OpenAI, when `OPENAI_API_KEY` is set.
    pub secondary: Option<LlmModelConfig>,
}

impl LlmProviders {
    /// Reads both providers from the process environment.
    ///
    /// # Errors
    /// Propagates malformed values (bad numbers, URLs, temperature range).
    /// Missing keys are not an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let me = Self {
            primary: config_gemini_from(lookup)?,
            secondary: config_openai_from(lookup)?,
        };
        if me.is_empty() {
            warn!("no AI provider key configured; triage will use rule-based scoring only");
        }
        Ok(me)
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }

    /// First configured provider.
    pub fn preferred(&self) -> Option<&LlmModelConfig> {
        self.primary.as_ref().or(self.secondary.as_ref())
    }

    /// Every configured provider, for health reporting.
    pub fn configured(&self) -> Vec<LlmModelConfig> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .cloned()
            .collect()
    }

    /// Client for the preferred provider, `None` when nothing is configured.
    ///
    /// # Errors
    /// Client construction failures (invalid key header, TLS setup).
    pub fn chat_model(&self) -> Result<Option<Arc<dyn ChatModel>>> {
        let Some(cfg) = self.preferred() else {
            return Ok(None);
        };
        let model = build_chat_model(cfg.clone())?;
        info!(provider = %model.provider(), model = %model.model(), "triage model selected");
        Ok(Some(model))
    }

    /// Client for photo analysis (OpenAI only). `None` when OpenAI is not configured.
    pub fn vision_model(&self) -> Result<Option<Arc<dyn ChatModel>>> {
        self.secondary
            .iter()
            .find(|c| c.provider == LlmProvider::OpenAI)
            .map(|cfg| {
                let vision = LlmModelConfig {
                    json_response: false,
                    ..cfg.clone()
                };
                build_chat_model(vision)
            })
            .transpose()
    }
}

/// Builds the concrete client for `cfg.provider`.
pub fn build_chat_model(cfg: LlmModelConfig) -> Result<Arc<dyn ChatModel>> {
    Ok(match cfg.provider {
        LlmProvider::Gemini => Arc::new(GeminiService::new(cfg)?),
        LlmProvider::OpenAI => Arc::new(OpenAiService::new(cfg)?),
    })
}
