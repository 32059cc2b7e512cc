//! Engine knobs read from the environment.
//!
//! - `TRIAGE_AI_TIMEOUT_SECS`    (default 15)
//! - `TRIAGE_STORE_TIMEOUT_SECS` (default 5)
//! - `SIMILAR_RADIUS_METERS`     (default 5000)
//! - `SIMILAR_WINDOW_DAYS`       (default 30)
//! - `SIMILAR_LIMIT`             (default 10)

use std::time::Duration;

use ai_llm_service::error_handler::{
    ConfigError, Lookup, Result, env_opt_u32, env_opt_u64, process_env,
};

use crate::ai_assessor::DEFAULT_AI_TIMEOUT;
use crate::orchestrator::{DEFAULT_STORE_TIMEOUT, SimilarPolicy};
use crate::similar::{DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE_METERS};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct TriageConfig {
    pub ai_timeout: Duration,
    pub similar: SimilarPolicy,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            ai_timeout: DEFAULT_AI_TIMEOUT,
            similar: SimilarPolicy::default(),
        }
    }
}

impl TriageConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    /// # Errors
    /// Malformed numbers, or a zero timeout/radius/window/limit.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        let ai_timeout = positive(
            env_opt_u64(lookup, "TRIAGE_AI_TIMEOUT_SECS")?,
            "TRIAGE_AI_TIMEOUT_SECS",
        )?
        .map_or(DEFAULT_AI_TIMEOUT, Duration::from_secs);
        let store_timeout = positive(
            env_opt_u64(lookup, "TRIAGE_STORE_TIMEOUT_SECS")?,
            "TRIAGE_STORE_TIMEOUT_SECS",
        )?
        .map_or(DEFAULT_STORE_TIMEOUT, Duration::from_secs);

        let radius = positive(
            env_opt_u32(lookup, "SIMILAR_RADIUS_METERS")?,
            "SIMILAR_RADIUS_METERS",
        )?
        .map_or(DEFAULT_MAX_DISTANCE_METERS, f64::from);
        let window_days = positive(env_opt_u32(lookup, "SIMILAR_WINDOW_DAYS")?, "SIMILAR_WINDOW_DAYS")?
            .unwrap_or(30);
        let limit = positive(env_opt_u32(lookup, "SIMILAR_LIMIT")?, "SIMILAR_LIMIT")?
            .unwrap_or(DEFAULT_LIMIT);

        Ok(Self {
            ai_timeout,
            similar: SimilarPolicy {
                max_distance_meters: radius,
                since: Duration::from_secs(u64::from(window_days) * SECS_PER_DAY),
                limit,
                timeout: store_timeout,
            },
        })
    }
}

fn positive<T>(value: Option<T>, field: &'static str) -> Result<Option<T>>
where
    T: PartialEq + From<u8>,
{
    match value {
        Some(v) if v == T::from(0) => Err(ConfigError::OutOfRange {
            field,
            detail: "must be greater than zero",
        }
        .into()),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similar::DEFAULT_SINCE;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<TriageConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TriageConfig::from_lookup(&|k: &str| map.get(k).cloned())
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg, TriageConfig::default());
        assert_eq!(cfg.similar.since, DEFAULT_SINCE);
        assert_eq!(cfg.similar.timeout, Duration::from_secs(5));
        assert_eq!(cfg.ai_timeout, Duration::from_secs(15));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&[
            ("TRIAGE_AI_TIMEOUT_SECS", "4"),
            ("TRIAGE_STORE_TIMEOUT_SECS", "1"),
            ("SIMILAR_RADIUS_METERS", "250"),
            ("SIMILAR_WINDOW_DAYS", "7"),
            ("SIMILAR_LIMIT", "3"),
        ])
        .unwrap();
        assert_eq!(cfg.ai_timeout, Duration::from_secs(4));
        assert_eq!(cfg.similar.timeout, Duration::from_secs(1));
        assert_eq!(cfg.similar.max_distance_meters, 250.0);
        assert_eq!(cfg.similar.since, Duration::from_secs(7 * 86_400));
        assert_eq!(cfg.similar.limit, 3);
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        assert!(load(&[("SIMILAR_LIMIT", "0")]).is_err());
        assert!(load(&[("SIMILAR_RADIUS_METERS", "far")]).is_err());
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        for var in ["TRIAGE_AI_TIMEOUT_SECS", "TRIAGE_STORE_TIMEOUT_SECS"] {
            let err = load(&[(var, "0")]).unwrap_err();
            assert!(
                matches!(
                    err,
                    ai_llm_service::AiLlmError::Config(ConfigError::OutOfRange { field, .. })
                        if field == var
                ),
                "{var}: {err}"
            );
        }
    }
}
