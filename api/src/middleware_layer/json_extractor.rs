use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header::CONTENT_TYPE, response::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{Envelope, FieldIssue};

const REQUEST_ID: &str = "X-Request-Id";

/// Report fields, most specific first so `coordinates` wins over `location`.
const KNOWN_FIELDS: [&str; 6] = [
    "coordinates",
    "location",
    "category",
    "description",
    "title",
    "photos",
];

async fn take_body(res: Response) -> (Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .iter()
        .find(|key| msg.contains(*key))
        .map(|key| (*key).to_string())
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("expected a sequence") || msg.contains("expected an array") {
        Some("Expected an array for this field (e.g. [\"https://...\"]).".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"type\": \"Point\", \"coordinates\": [77.59, 12.97] }).".into())
    } else if msg.contains("missing field") {
        Some("Required field is absent from the request body.".into())
    } else {
        None
    }
}

/// Error bodies built by [`crate::error_handler::AppError`] carry a top-level
/// `"success": false`.
fn is_failure_envelope(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| v.get("success").and_then(serde_json::Value::as_bool))
        == Some(false)
}

fn ensure_request_id(parts: &mut Parts) -> String {
    if let Some(v) = parts.headers.get(REQUEST_ID).and_then(|h| h.to_str().ok()) {
        if !v.trim().is_empty() {
            return v.to_string();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert(REQUEST_ID, value);
    }
    id
}

/// Rewrites axum's plain-text JSON rejections (400/415/422) into the
/// [`Envelope`] failure body. Other responses pass through untouched.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    let code = match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => return res,
    };

    let (mut parts, bytes) = take_body(res).await;
    let req_id = ensure_request_id(&mut parts);
    if is_failure_envelope(&bytes) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    debug!(%req_id, status = status.as_u16(), "rewriting rejection into envelope");

    let detail = FieldIssue {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };
    let envelope = Envelope::failure(code, original.trim()).with_details([detail]);
    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_prefers_most_specific_field() {
        let msg = "Failed to deserialize the JSON body into the target type: location.coordinates: invalid length 1";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("coordinates"));
        assert_eq!(guess_path_from_serde_msg("missing field `title`").as_deref(), Some("title"));
        assert!(guess_path_from_serde_msg("EOF while parsing").is_none());
    }

    #[test]
    fn hints_follow_serde_wording() {
        assert!(hint_from_serde_msg("photos: invalid type: string, expected a sequence").is_some());
        assert!(hint_from_serde_msg("missing field `category`").is_some());
        assert!(hint_from_serde_msg("trailing characters").is_none());
    }

    #[test]
    fn only_failure_envelopes_pass_through() {
        assert!(is_failure_envelope(
            br#"{"success":false,"error":{"code":"X","message":"m"}}"#
        ));
        assert!(!is_failure_envelope(br#"{"success":true,"data":{}}"#));
        assert!(!is_failure_envelope(br#"{"success":"false"}"#));
        assert!(!is_failure_envelope(b"Failed to parse the request body as JSON"));
    }

    #[test]
    fn request_id_is_generated_once() {
        let (mut parts, _) = Response::new(Body::empty()).into_parts();
        let id = ensure_request_id(&mut parts);
        assert!(id.starts_with("req-"));
        assert_eq!(ensure_request_id(&mut parts), id);
    }
}
