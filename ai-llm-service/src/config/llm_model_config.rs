use std::fmt;

use crate::config::llm_provider::LlmProvider;

/// Configuration for one provider/model pair.
///
/// # Fields
///
/// - `provider`: which backend serves the model.
/// - `model`: model identifier (e.g., `"gemini-2.0-flash-exp"`, `"gpt-4o-mini"`).
/// - `endpoint`: API base URL, without the versioned path.
/// - `api_key`: credential; both supported providers require one.
/// - `max_tokens`: output token cap.
/// - `temperature`: sampling temperature (`0.0..=2.0`).
/// - `json_response`: ask the provider for a JSON-only reply.
/// - `timeout_secs`: HTTP client timeout.
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub json_response: bool,
    pub timeout_secs: Option<u64>,
}

// Manual impl keeps the key out of logs.
impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("json_response", &self.json_response)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
