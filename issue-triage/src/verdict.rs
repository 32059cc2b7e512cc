//! Extraction and validation of the model's JSON verdict.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::errors::VerdictError;
use crate::model::PriorityLevel;

/// The object the triage prompt asks for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiVerdict {
    #[serde(deserialize_with = "priority_name")]
    pub priority: PriorityLevel,
    #[serde(deserialize_with = "score_in_range")]
    pub score: u8,
    pub reasoning: String,
    pub safety_risk: String,
    pub urgency_level: String,
    pub impact_assessment: String,
}

/// Returns the first `{...}` in `text` that parses as a JSON object.
///
/// Tolerates markdown fences, prose before or after the object, and stray
/// braces that do not start valid JSON.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => Some(map),
            _ => None,
        }
    })
}

/// Reads a typed object out of free-form model output.
///
/// # Errors
/// [`VerdictError::NoJsonObject`] when nothing parses,
/// [`VerdictError::Schema`] when required fields are missing or mistyped.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, VerdictError> {
    let object = extract_json_object(text).ok_or(VerdictError::NoJsonObject)?;
    serde_json::from_value(Value::Object(object)).map_err(|e| VerdictError::Schema(e.to_string()))
}

/// Parses a triage verdict.
pub fn parse_verdict(text: &str) -> Result<AiVerdict, VerdictError> {
    parse_json_reply(text)
}

pub(crate) fn priority_name<'de, D>(d: D) -> Result<PriorityLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn score_in_range<'de, D>(d: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(d)?;
    if n.is_finite() && (0.0..=100.0).contains(&n) {
        Ok(n.round() as u8)
    } else {
        Err(serde::de::Error::custom(format!(
            "score {n} outside 0..=100"
        )))
    }
}
