//! Payload flattening.
//!
//! Nested objects and arrays are reduced to a flat list of dotted paths.
//! Object members are addressed as `parent.key`, array elements as
//! `parent.index` (zero-based):
//!
//! ```text
//! {"a": {"b": [true, null]}, "c": "x"}
//!   → a.b.0 = true
//!   → a.b.1 = null
//!   → c     = "x"
//! ```
//!
//! Empty objects and arrays produce no entries at all.

use std::collections::HashSet;

use serde_json::{Number, Value};

use super::error::SignatureError;

/// Maximum container nesting accepted before the payload is rejected.
///
/// `serde_json` refuses to parse deeper documents with the same limit, so
/// this only triggers for values built in code.
pub const MAX_DEPTH: usize = 128;

/// A leaf value of the payload, borrowed from the original document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Number(&'a Number),
    String(&'a str),
}

impl<'a> Scalar<'a> {
    /// The scalar behind `value`, or `None` for objects and arrays.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => Some(Scalar::Number(n)),
            Value::String(s) => Some(Scalar::String(s.as_str())),
            Value::Object(_) | Value::Array(_) => None,
        }
    }
}

/// One flattened leaf: its dotted path and its scalar value.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    pub path: String,
    pub value: Scalar<'a>,
}

/// Flatten a payload into `(path, scalar)` entries.
///
/// The root must be an object or an array. Fails with
/// [`SignatureError::InvalidPayload`] on a scalar root, on nesting deeper
/// than [`MAX_DEPTH`], or when two leaves resolve to the same path
/// (e.g. `{"a.b": 1, "a": {"b": 2}}`).
pub fn flatten_payload(payload: &Value) -> Result<Vec<FlatEntry<'_>>, SignatureError> {
    if !is_container(payload) {
        return Err(SignatureError::InvalidPayload(format!(
            "expected an object or array at the root, got {}",
            kind(payload)
        )));
    }

    let mut flattener = Flattener::default();
    flattener.visit(payload, None, 0)?;

    Ok(flattener.entries)
}

#[derive(Default)]
struct Flattener<'a> {
    entries: Vec<FlatEntry<'a>>,
    seen: HashSet<String>,
}

impl<'a> Flattener<'a> {
    /// Walk the children of an object or array.
    fn visit(
        &mut self,
        node: &'a Value,
        parent: Option<&str>,
        depth: usize,
    ) -> Result<(), SignatureError> {
        if depth >= MAX_DEPTH {
            return Err(SignatureError::InvalidPayload(format!(
                "nesting exceeds {} levels",
                MAX_DEPTH
            )));
        }

        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    self.descend(child, child_path(parent, key), depth)?;
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.descend(child, child_path(parent, &index.to_string()), depth)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn descend(&mut self, child: &'a Value, path: String, depth: usize) -> Result<(), SignatureError> {
        let value = match Scalar::from_value(child) {
            Some(value) => value,
            None => return self.visit(child, Some(&path), depth + 1),
        };

        if !self.seen.insert(path.clone()) {
            return Err(SignatureError::InvalidPayload(format!(
                "duplicate path '{}'",
                path
            )));
        }

        self.entries.push(FlatEntry { path, value });
        Ok(())
    }
}

fn child_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{}.{}", parent, key),
        None => key.to_string(),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(payload: &Value) -> Vec<String> {
        let mut paths: Vec<String> = flatten_payload(payload)
            .unwrap()
            .into_iter()
            .map(|e| e.path)
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_flatten_nested_objects() {
        let payload = json!({"a": {"b": "x", "c": null}, "d": true});
        let entries = flatten_payload(&payload).unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&FlatEntry {
            path: "a.b".to_string(),
            value: Scalar::String("x"),
        }));
        assert!(entries.contains(&FlatEntry {
            path: "a.c".to_string(),
            value: Scalar::Null,
        }));
        assert!(entries.contains(&FlatEntry {
            path: "d".to_string(),
            value: Scalar::Bool(true),
        }));
    }

    #[test]
    fn test_flatten_arrays_use_indices() {
        let payload = json!({"owners": [{"name": "A"}, {"name": "B"}], "tags": ["x", "y"]});
        assert_eq!(
            paths(&payload),
            vec!["owners.0.name", "owners.1.name", "tags.0", "tags.1"]
        );
    }

    #[test]
    fn test_flatten_nested_arrays() {
        let payload = json!({"m": [[1, 2], [3]]});
        assert_eq!(paths(&payload), vec!["m.0.0", "m.0.1", "m.1.0"]);
    }

    #[test]
    fn test_flatten_root_array() {
        let payload = json!(["a", {"b": 1}]);
        assert_eq!(paths(&payload), vec!["0", "1.b"]);
    }

    #[test]
    fn test_flatten_empty_containers_vanish() {
        let payload = json!({"a": {}, "b": [], "c": 1});
        assert_eq!(paths(&payload), vec!["c"]);
    }

    #[test]
    fn test_flatten_scalar_root_rejected() {
        for payload in [json!(null), json!(1), json!("x"), json!(true)] {
            assert!(matches!(
                flatten_payload(&payload),
                Err(SignatureError::InvalidPayload(_))
            ));
        }
    }

    #[test]
    fn test_flatten_duplicate_path_rejected() {
        let payload = json!({"a.b": 1, "a": {"b": 2}});
        let err = flatten_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            SignatureError::InvalidPayload("duplicate path 'a.b'".to_string())
        );
    }

    #[test]
    fn test_flatten_depth_limit() {
        let mut deep = json!("leaf");
        for _ in 0..MAX_DEPTH + 1 {
            deep = json!({ "n": deep });
        }
        assert!(matches!(
            flatten_payload(&deep),
            Err(SignatureError::InvalidPayload(_))
        ));

        let mut shallow = json!("leaf");
        for _ in 0..MAX_DEPTH - 1 {
            shallow = json!({ "n": shallow });
        }
        assert_eq!(flatten_payload(&shallow).unwrap().len(), 1);
    }
}
