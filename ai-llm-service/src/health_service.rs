//! Reachability probes for the configured AI providers.
//!
//! Both providers expose a "get model" resource, so one probe covers them:
//! `GET` the model with the provider's auth header and map the status.
//!
//! | provider | resource                              | auth header      |
//! |----------|---------------------------------------|------------------|
//! | Gemini   | `{endpoint}/v1beta/models/{model}`    | `x-goog-api-key` |
//! | OpenAI   | `{endpoint}/v1/models/{model}`        | `Authorization`  |

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, is_http_endpoint, make_snippet};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const GEMINI_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

/// Probe result for one provider, as served on `/health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub provider: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u64,
    pub detail: String,
}

/// What to request for one provider.
#[derive(Debug)]
struct ProbeTarget {
    url: String,
    auth: (HeaderName, HeaderValue),
}

impl ProbeTarget {
    fn for_config(cfg: &LlmModelConfig) -> Result<Self, HealthError> {
        let base = cfg.endpoint.trim().trim_end_matches('/');
        if !is_http_endpoint(base) {
            return Err(HealthError::InvalidEndpoint(cfg.endpoint.clone()));
        }
        let key = cfg
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| HealthError::Credential("missing API key".into()))?;

        let (url, name, raw) = match cfg.provider {
            LlmProvider::Gemini => (
                format!("{base}/v1beta/models/{}", cfg.model),
                GEMINI_KEY_HEADER,
                key.to_string(),
            ),
            LlmProvider::OpenAI => (
                format!("{base}/v1/models/{}", cfg.model),
                AUTHORIZATION,
                format!("Bearer {key}"),
            ),
        };

        let mut value =
            HeaderValue::from_str(&raw).map_err(|e| HealthError::Credential(e.to_string()))?;
        value.set_sensitive(true);

        Ok(Self {
            url,
            auth: (name, value),
        })
    }
}

/// Shared client for provider probes.
pub struct HealthService {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthService {
    /// # Errors
    /// [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = timeout_secs.map_or(DEFAULT_PROBE_TIMEOUT, Duration::from_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Probes one provider. Failures become `ok: false` with a reason.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let started = Instant::now();
        let outcome = self.probe(cfg).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (ok, detail) = match outcome {
            Ok(()) => (true, "model available".to_string()),
            Err(e) => {
                warn!(provider = %cfg.provider, model = %cfg.model, error = %e, "provider probe failed");
                (false, e.to_string())
            }
        };
        info!(provider = %cfg.provider, ok, latency_ms, "provider probe completed");

        HealthStatus {
            provider: cfg.provider.to_string(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            detail,
        }
    }

    /// Probes every config in order.
    pub async fn check_many(&self, configs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn probe(&self, cfg: &LlmModelConfig) -> Result<(), AiLlmError> {
        let ProbeTarget { url, auth } = ProbeTarget::for_config(cfg)?;
        let timeout = cfg.timeout_secs.map_or(self.timeout, Duration::from_secs);
        debug!(provider = %cfg.provider, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(auth.0, auth.1)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let snippet = make_snippet(&resp.text().await.unwrap_or_default());
        Err(HealthError::HttpStatus(HttpError {
            status,
            url,
            snippet,
        })
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider, endpoint: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "m-1".into(),
            endpoint: endpoint.into(),
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: None,
            json_response: false,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn targets_use_each_provider_model_resource() {
        let g = ProbeTarget::for_config(&cfg(LlmProvider::Gemini, "https://g.test/", Some("k")))
            .unwrap();
        assert_eq!(g.url, "https://g.test/v1beta/models/m-1");
        assert_eq!(g.auth.0.as_str(), "x-goog-api-key");
        assert!(g.auth.1.is_sensitive());

        let o = ProbeTarget::for_config(&cfg(LlmProvider::OpenAI, "https://o.test", Some("k")))
            .unwrap();
        assert_eq!(o.url, "https://o.test/v1/models/m-1");
        assert_eq!(o.auth.0, AUTHORIZATION);
        assert_eq!(o.auth.1.to_str().unwrap(), "Bearer k");
    }

    #[test]
    fn unusable_configs_are_rejected_before_io() {
        assert!(matches!(
            ProbeTarget::for_config(&cfg(LlmProvider::Gemini, "localhost:1", Some("k"))),
            Err(HealthError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            ProbeTarget::for_config(&cfg(LlmProvider::OpenAI, "https://o.test", None)),
            Err(HealthError::Credential(_))
        ));
        assert!(matches!(
            ProbeTarget::for_config(&cfg(LlmProvider::OpenAI, "https://o.test", Some("a\nb"))),
            Err(HealthError::Credential(_))
        ));
    }

    #[tokio::test]
    async fn invalid_endpoint_reports_failure() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check(&cfg(LlmProvider::Gemini, "localhost:1", Some("k"))).await;
        assert!(!status.ok);
        assert_eq!(status.provider, "Gemini");
        assert!(status.detail.contains("invalid endpoint"));
    }

    #[tokio::test]
    async fn unreachable_provider_maps_to_failed_status() {
        let svc = HealthService::new(Some(1)).unwrap();
        // Nothing speaks HTTP on the loopback discard port.
        let statuses = svc
            .check_many(&[cfg(LlmProvider::OpenAI, "http://127.0.0.1:9", Some("k"))])
            .await;
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].ok);
        assert_eq!(statuses[0].model, "m-1");
    }
}
