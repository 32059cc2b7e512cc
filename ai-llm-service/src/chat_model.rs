//! Provider-agnostic chat capability.
//!
//! Callers hold an `Arc<dyn ChatModel>` and never see which provider is
//! behind it; tests substitute canned fakes.

use async_trait::async_trait;

use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ProviderError, ProviderErrorKind, Result};

/// Single-turn text generation against a hosted model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn provider(&self) -> LlmProvider;

    fn model(&self) -> &str;

    /// Sends `prompt` (plus an optional system instruction) and returns the
    /// raw reply text.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String>;

    /// Sends `prompt` together with one image URL. Providers without vision
    /// support return [`ProviderErrorKind::Unsupported`].
    async fn describe_image(&self, _prompt: &str, _image_url: &str) -> Result<String> {
        Err(ProviderError::new(self.provider(), ProviderErrorKind::Unsupported("image input")).into())
    }
}
