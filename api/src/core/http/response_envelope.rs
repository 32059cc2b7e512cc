//! JSON body shared by every endpoint.
//!
//! ```text
//! { "success": true,  "data": { "issueId": "...", "assessment": { ... } } }
//! { "success": false, "error": { "code": "INVALID_INPUT", "message": "...",
//!                                "details": [{ "path": "title", "hint": "..." }] } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// `INVALID_INPUT`, `BAD_REQUEST`, ...
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldIssue>,
}

/// Points a client at the offending part of an issue report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    /// `title`, `location.coordinates`, `photos`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FieldIssue {
    pub fn at(path: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            hint: Some(hint.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.hint.is_none()
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl Envelope<()> {
    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
                details: Vec::new(),
            }),
        }
    }

    /// Attaches field details; empty ones are dropped.
    pub fn with_details(mut self, details: impl IntoIterator<Item = FieldIssue>) -> Self {
        if let Some(err) = self.error.as_mut() {
            err.details
                .extend(details.into_iter().filter(|d| !d.is_empty()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_carries_data_only() {
        let v = serde_json::to_value(Envelope::ok(json!({ "score": 40 }))).unwrap();
        assert_eq!(v, json!({ "success": true, "data": { "score": 40 } }));
    }

    #[test]
    fn failure_keeps_only_meaningful_details() {
        let env = Envelope::failure("INVALID_INPUT", "missing required field `title`").with_details([
            FieldIssue::at("title", "Must be a non-empty string."),
            FieldIssue {
                path: None,
                hint: None,
            },
        ]);
        let v = serde_json::to_value(env).unwrap();
        assert_eq!(v["success"], false);
        assert!(v.get("data").is_none());
        assert_eq!(v["error"]["code"], "INVALID_INPUT");
        assert_eq!(
            v["error"]["details"],
            json!([{ "path": "title", "hint": "Must be a non-empty string." }])
        );
    }

    #[test]
    fn failure_without_details_omits_the_list() {
        let v = serde_json::to_value(Envelope::failure("BAD_REQUEST", "x")).unwrap();
        assert!(v["error"].get("details").is_none());
    }
}
