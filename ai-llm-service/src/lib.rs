//! Shared LLM provider layer for civic issue triage.
//!
//! - [`config`]: provider configs and env loading
//! - [`services`]: Gemini and OpenAI HTTP clients
//! - [`ChatModel`]: the capability the triage engine depends on
//! - [`LlmProviders`]: primary/secondary selection
//! - [`health_service`]: `/health` probes

pub mod chat_model;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod provider_select;
pub mod services;

pub use chat_model::ChatModel;
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ProviderError, ProviderErrorKind};
pub use health_service::{HealthService, HealthStatus};
pub use provider_select::{LlmProviders, build_chat_model};
