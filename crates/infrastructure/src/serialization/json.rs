//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Fields in declaration order
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restproxy_domain::{HttpMethod, QueryParam, StoredRequest};

    fn stored() -> StoredRequest {
        let mut query = restproxy_domain::QueryParams::new();
        query.add(QueryParam::new("expand", "names"));
        StoredRequest {
            method: HttpMethod::Get,
            path: "/rest/api/3/issue/OPS-1".to_string(),
            query,
            headers: restproxy_domain::Headers::new(),
            accept: Some("application/json".to_string()),
            content_type: None,
            body: None,
        }
    }

    #[test]
    fn test_stable_serialization_layout() {
        let json = to_json_stable(&stored()).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.starts_with("{\n  \"method\": \"GET\",\n  \"path\""));
        assert!(!json.contains("contentType"));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let json = to_json_stable(&stored()).unwrap();
        let restored: StoredRequest = from_json(&json).unwrap();
        assert_eq!(restored, stored());
    }

    #[test]
    fn test_invalid_json_is_deserialize_error() {
        let result: Result<StoredRequest, _> = from_json("{\"method\": 5}");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
