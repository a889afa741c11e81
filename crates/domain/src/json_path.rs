//! Dot-path helpers over `serde_json::Value`.
//!
//! Paths are `.`-separated object keys. When reading, a numeric segment
//! also indexes into an array.

use serde_json::{Map, Value};

/// Looks up a nested value by dot-path.
#[must_use]
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Sets a nested value by dot-path, creating intermediate objects on demand.
///
/// A non-object root or intermediate value is replaced by an empty object.
pub fn set(root: &mut Value, path: &str, new_value: Value) {
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    let Value::Object(map) = root else {
        return;
    };

    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), new_value);
        }
        Some((head, rest)) => {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            set(child, rest, new_value);
        }
    }
}

/// Returns the last segment of a dot-path.
#[must_use]
pub fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Renders a value as a scalar string.
///
/// Strings are verbatim, numbers keep their JSON text, booleans are
/// `true`/`false`, null is empty, and arrays or objects are compact JSON.
#[must_use]
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let value = json!({"fields": {"status": {"name": "Open"}}, "tags": ["a", "b"]});
        assert_eq!(get(&value, "fields.status.name"), Some(&json!("Open")));
        assert_eq!(get(&value, "tags.1"), Some(&json!("b")));
        assert_eq!(get(&value, "fields.missing"), None);
        assert_eq!(get(&value, "fields.status.name.deeper"), None);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut value = json!({});
        set(&mut value, "fields.priority.name", json!("High"));
        set(&mut value, "fields.summary", json!("Title"));
        assert_eq!(
            value,
            json!({"fields": {"priority": {"name": "High"}, "summary": "Title"}})
        );
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut value = json!({"fields": "oops"});
        set(&mut value, "fields.summary", json!("x"));
        assert_eq!(value, json!({"fields": {"summary": "x"}}));

        let mut scalar_root = json!(3);
        set(&mut scalar_root, "a", json!(1));
        assert_eq!(scalar_root, json!({"a": 1}));

        let mut array_intermediate = json!({"labels": ["a"], "keep": true});
        set(&mut array_intermediate, "labels.first", json!("b"));
        assert_eq!(
            array_intermediate,
            json!({"labels": {"first": "b"}, "keep": true})
        );
    }

    #[test]
    fn test_leaf() {
        assert_eq!(leaf("fields.status.name"), "name");
        assert_eq!(leaf("key"), "key");
    }

    #[test]
    fn test_scalar_string() {
        assert_eq!(scalar_string(&json!("open")), "open");
        assert_eq!(scalar_string(&json!(42)), "42");
        assert_eq!(scalar_string(&json!(1.5)), "1.5");
        assert_eq!(scalar_string(&json!(true)), "true");
        assert_eq!(scalar_string(&Value::Null), "");
        assert_eq!(scalar_string(&json!({"a": [1]})), r#"{"a":[1]}"#);
    }
}
