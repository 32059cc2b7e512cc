//! Provider configs loaded from environment variables.
//!
//! A provider is "configured" when its API key is present; every other
//! setting has a default. Returns `Ok(None)` for an unconfigured provider so
//! the caller can fall back to the next one.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_MAX_TOKENS`   = output token cap (default 500)
//! - `LLM_TEMPERATURE`  = sampling temperature, `0.0..=2.0` (default 0.3)
//! - `LLM_TIMEOUT_SECS` = HTTP timeout per provider call (default 15)
//!
//! Gemini:
//! - `GEMINI_API_KEY` (enables the provider)
//! - `GEMINI_MODEL`   (default `gemini-2.0-flash-exp`)
//! - `GEMINI_URL`     (default `https://generativelanguage.googleapis.com`)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` (enables the provider)
//! - `OPENAI_MODEL`   (default `gpt-4o-mini`)
//! - `OPENAI_URL`     (default `https://api.openai.com`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        Lookup, Result, env_non_empty, env_opt_f32, env_opt_u32, env_opt_u64,
        process_env, validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Gemini config from the process environment.
pub fn config_gemini() -> Result<Option<LlmModelConfig>> {
    config_gemini_from(&process_env)
}

/// OpenAI config from the process environment.
pub fn config_openai() -> Result<Option<LlmModelConfig>> {
    config_openai_from(&process_env)
}

pub fn config_gemini_from(lookup: Lookup<'_>) -> Result<Option<LlmModelConfig>> {
    provider_config(
        lookup,
        LlmProvider::Gemini,
        ProviderVars {
            key: "GEMINI_API_KEY",
            model: "GEMINI_MODEL",
            url: "GEMINI_URL",
            default_model: DEFAULT_GEMINI_MODEL,
            default_url: DEFAULT_GEMINI_URL,
        },
    )
}

pub fn config_openai_from(lookup: Lookup<'_>) -> Result<Option<LlmModelConfig>> {
    provider_config(
        lookup,
        LlmProvider::OpenAI,
        ProviderVars {
            key: "OPENAI_API_KEY",
            model: "OPENAI_MODEL",
            url: "OPENAI_URL",
            default_model: DEFAULT_OPENAI_MODEL,
            default_url: DEFAULT_OPENAI_URL,
        },
    )
}

struct ProviderVars {
    key: &'static str,
    model: &'static str,
    url: &'static str,
    default_model: &'static str,
    default_url: &'static str,
}

fn provider_config(
    lookup: Lookup<'_>,
    provider: LlmProvider,
    vars: ProviderVars,
) -> Result<Option<LlmModelConfig>> {
    let Some(api_key) = env_non_empty(lookup, vars.key) else {
        return Ok(None);
    };

    let model = env_non_empty(lookup, vars.model).unwrap_or_else(|| vars.default_model.into());

    let endpoint = env_non_empty(lookup, vars.url).unwrap_or_else(|| vars.default_url.into());
    validate_http_endpoint(vars.url, &endpoint)?;

    let SharedKnobs {
        max_tokens,
        temperature,
        timeout_secs,
    } = shared_knobs(lookup)?;

    Ok(Some(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        json_response: true,
        timeout_secs: Some(timeout_secs),
    }))
}

struct SharedKnobs {
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
}

fn shared_knobs(lookup: Lookup<'_>) -> Result<SharedKnobs> {
    let max_tokens = env_opt_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let temperature = env_opt_f32(lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", "expected 0.0..=2.0", temperature, 0.0, 2.0)?;
    let timeout_secs = env_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(SharedKnobs {
        max_tokens,
        temperature,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::{AiLlmError, ConfigError};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn provider_without_key_is_not_configured() {
        let env = lookup_from(&[("GEMINI_MODEL", "gemini-pro")]);
        assert!(config_gemini_from(&env).unwrap().is_none());
        assert!(config_openai_from(&env).unwrap().is_none());
    }

    #[test]
    fn defaults_fill_everything_but_the_key() {
        let env = lookup_from(&[("GEMINI_API_KEY", "g-key")]);
        let cfg = config_gemini_from(&env).unwrap().unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_GEMINI_URL);
        assert_eq!(cfg.api_key.as_deref(), Some("g-key"));
        assert_eq!(cfg.max_tokens, Some(500));
        assert_eq!(cfg.temperature, Some(0.3));
        assert_eq!(cfg.timeout_secs, Some(15));
        assert!(cfg.json_response);
    }

    #[test]
    fn overrides_are_applied() {
        let env = lookup_from(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_URL", "http://localhost:8080/"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_TEMPERATURE", "1.5"),
            ("LLM_TIMEOUT_SECS", "3"),
        ]);
        let cfg = config_openai_from(&env).unwrap().unwrap();
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.endpoint, "http://localhost:8080/");
        assert_eq!(cfg.max_tokens, Some(256));
        assert_eq!(cfg.temperature, Some(1.5));
        assert_eq!(cfg.timeout_secs, Some(3));
    }

    #[test]
    fn invalid_values_fail_loudly() {
        let env = lookup_from(&[("OPENAI_API_KEY", "sk-1"), ("LLM_TEMPERATURE", "3.5")]);
        assert!(matches!(
            config_openai_from(&env),
            Err(AiLlmError::Config(ConfigError::OutOfRange { field: "temperature", .. }))
        ));

        let env = lookup_from(&[("GEMINI_API_KEY", "g"), ("GEMINI_URL", "ftp://x")]);
        assert!(matches!(
            config_gemini_from(&env),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { var: "GEMINI_URL", .. }))
        ));
    }
}
