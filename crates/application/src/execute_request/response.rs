//! Response body interpretation and envelope metadata.

use std::path::Path;
use std::time::Instant;

use restproxy_domain::{Meta, RequestCommandOptions, ResponseSpec, VERSION};
use serde_json::{Map, Value, json};

/// Parses the body as JSON when the content type or the first character
/// says so, falls back to text, and yields `None` for an empty body.
pub(super) fn parse_body(response: &ResponseSpec) -> Option<Value> {
    if response.body_bytes.is_empty() {
        return None;
    }

    let text = response.body_as_string_lossy();
    let looks_like_json = response.content_type.as_deref().is_some_and(is_json_content_type)
        || text.trim_start().starts_with(['{', '[']);

    if looks_like_json {
        if let Ok(value) = serde_json::from_slice(&response.body_bytes) {
            return Some(value);
        }
    }
    Some(Value::String(text))
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.parse::<mime::Mime>().is_ok_and(|mime| {
        mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
    })
}

/// `HTTP 404 Not Found`, followed by the server's own message when the
/// body carries one.
pub(super) fn error_message(response: &ResponseSpec, details: Option<&Value>) -> String {
    let status = format!("HTTP {}", response.status_code());
    match details.and_then(server_message) {
        Some(message) => format!("{status}: {message}"),
        None => status,
    }
}

fn server_message(details: &Value) -> Option<String> {
    let first_error = details
        .get("errorMessages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.iter().find_map(Value::as_str));

    first_error
        .or_else(|| details.get("message").and_then(Value::as_str))
        .or_else(|| details.get("error").and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// The `data` reported when the body went to a file instead of stdout.
pub(super) fn saved_descriptor(path: &Path, response: &ResponseSpec) -> Value {
    let mut descriptor = Map::new();
    descriptor.insert("savedTo".into(), json!(path.display().to_string()));
    descriptor.insert("bytes".into(), json!(response.body_bytes.len()));
    if let Some(content_type) = &response.content_type {
        descriptor.insert("contentType".into(), json!(content_type));
    }
    Value::Object(descriptor)
}

pub(super) fn build_meta(
    options: &RequestCommandOptions,
    response: Option<&ResponseSpec>,
    started: Instant,
) -> Meta {
    Meta {
        request_id: response.and_then(ResponseSpec::request_id).map(str::to_string),
        duration_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
        status_code: response.map(|r| r.status),
        method: Some(options.method.to_string()),
        path: Some(options.path.clone()),
        ..Meta::new(VERSION)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{response, response_with_headers};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(&response(200, "")), None);
        assert_eq!(
            parse_body(&response(200, r#"{"ok":true}"#)),
            Some(json!({"ok": true}))
        );
        assert_eq!(
            parse_body(&response_with_headers(200, " [1,2]", &[("Content-Type", "text/plain")])),
            Some(json!([1, 2]))
        );
        assert_eq!(
            parse_body(&response_with_headers(200, "hello", &[("Content-Type", "text/plain")])),
            Some(json!("hello"))
        );
        assert_eq!(
            parse_body(&response(200, "{broken")),
            Some(json!("{broken"))
        );
    }

    #[test]
    fn test_vendor_json_content_type() {
        let vendor = response_with_headers(
            200,
            "42",
            &[("Content-Type", "application/vnd.api+json; charset=utf-8")],
        );
        assert_eq!(parse_body(&vendor), Some(json!(42)));
    }

    #[test]
    fn test_error_message_prefers_server_text() {
        let body = json!({"errorMessages": ["Issue does not exist"], "errors": {}});
        assert_eq!(
            error_message(&response(404, ""), Some(&body)),
            "HTTP 404 Not Found: Issue does not exist"
        );
        assert_eq!(
            error_message(&response(500, ""), Some(&json!({"message": "boom"}))),
            "HTTP 500 Internal Server Error: boom"
        );
        assert_eq!(
            error_message(&response(401, ""), Some(&json!("plain text"))),
            "HTTP 401 Unauthorized"
        );
    }

    #[test]
    fn test_saved_descriptor() {
        let saved = saved_descriptor(Path::new("out/file.bin"), &response(200, "abc"));
        assert_eq!(
            saved,
            json!({"savedTo": "out/file.bin", "bytes": 3, "contentType": "application/json"})
        );
    }
}
