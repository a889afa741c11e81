//! Request bodies built from `--field path=value` flags.
//!
//! Each field is set on a base JSON object by dot-path. Values that parse as
//! JSON keep their type; anything else becomes a string.

use restproxy_domain::{DomainError, DomainResult, json_path};
use serde_json::{Map, Value};

/// Parses a `path=value` field flag.
///
/// # Errors
///
/// Returns an error if there is no `=` or the path is empty.
pub fn parse_field(raw: &str) -> DomainResult<(String, String)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| DomainError::InvalidBody(format!("field '{raw}' must be path=value")))?;
    let path = path.trim();
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(DomainError::InvalidBody(format!(
            "field '{raw}' has an empty path segment"
        )));
    }
    Ok((path.to_string(), value.to_string()))
}

/// Merges `fields` onto `base` and returns the serialized body.
///
/// Without fields the base body is returned untouched. With fields, the base
/// (or `{}` when absent) must be a JSON object.
///
/// # Errors
///
/// Returns an error if fields are given and the base is not a JSON object.
pub fn build_body(base: Option<&str>, fields: &[(String, String)]) -> DomainResult<Option<String>> {
    if fields.is_empty() {
        return Ok(base.map(str::to_string));
    }

    let mut body = match base.map(str::trim).filter(|b| !b.is_empty()) {
        None => Value::Object(Map::new()),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                return Err(DomainError::InvalidBody(
                    "fields can only be merged into a JSON object body".to_string(),
                ));
            }
            Err(e) => return Err(DomainError::InvalidBody(e.to_string())),
        },
    };

    for (path, raw) in fields {
        json_path::set(&mut body, path, field_value(raw));
    }

    Ok(Some(body.to_string()))
}

fn field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
