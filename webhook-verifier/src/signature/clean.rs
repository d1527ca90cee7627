//! Empty-value filtering and scalar normalization.
//!
//! After flattening, every leaf is either dropped (when it carries no
//! information) or rendered to the exact text that goes into the canonical
//! string:
//!
//! | value            | result                                  |
//! |------------------|-----------------------------------------|
//! | `null`           | dropped                                 |
//! | blank string     | dropped                                 |
//! | string           | all whitespace removed                  |
//! | `true` / `false` | `"true"` / `"false"` (kept)             |
//! | integer          | decimal digits                          |
//! | float            | ECMAScript `Number.prototype.toString`  |
//!
//! "Whitespace" is the set matched by the JavaScript regex class `\s`, so
//! senders stripping with `/\s+/g` agree on every character.

use serde_json::{Number, Value};

use super::flatten::{FlatEntry, Scalar};

/// Returns `true` if a value carries information worth signing.
///
/// Objects and arrays count only if at least one member is itself
/// non-empty. Booleans are always kept, `false` included.
pub fn is_value_not_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(is_value_not_empty),
        Value::Object(map) => map.values().any(is_value_not_empty),
        scalar => Scalar::from_value(scalar).map_or(false, is_scalar_not_empty),
    }
}

/// Leaf form of [`is_value_not_empty`]; the cleaner drops a leaf exactly
/// when this returns `false`.
pub fn is_scalar_not_empty(value: Scalar<'_>) -> bool {
    match value {
        Scalar::Null => false,
        Scalar::Bool(_) | Scalar::Number(_) => true,
        Scalar::String(s) => s.chars().any(|c| !is_js_whitespace(c)),
    }
}

/// Drop empty leaves and render the remaining ones as text.
///
/// Input order is preserved; ordering is the sorter's job.
pub fn clean_entries(entries: Vec<FlatEntry<'_>>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .filter(|entry| is_scalar_not_empty(entry.value))
        .map(|entry| (entry.path, render_scalar(entry.value)))
        .collect()
}

fn render_scalar(value: Scalar<'_>) -> String {
    match value {
        Scalar::Null => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number(n) => render_number(n),
        Scalar::String(s) => strip_whitespace(s),
    }
}

/// Render a number the way JavaScript prints it.
///
/// Floats go through `ryu-js`: decimal notation for 1e-7 <= |x| < 1e21,
/// `1e+21` / `1e-7` style outside it, no trailing `.0`, and `-0` as `0`.
/// Integers keep their exact digits.
fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => {
            if f == 0.0 {
                return "0".to_string();
            }
            ryu_js::Buffer::new().format(f).to_string()
        }
        _ => n.to_string(),
    }
}

/// JavaScript `\s`: ECMAScript WhiteSpace plus LineTerminator.
///
/// Same as Unicode `White_Space` except U+0085 is excluded and U+FEFF is
/// included.
fn is_js_whitespace(c: char) -> bool {
    match c {
        '\u{0085}' => false,
        '\u{FEFF}' => true,
        c => c.is_whitespace(),
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !is_js_whitespace(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::flatten::flatten_payload;
    use serde_json::json;

    fn cleaned(payload: Value) -> Vec<(String, String)> {
        let mut out = clean_entries(flatten_payload(&payload).unwrap());
        out.sort();
        out
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn number_text(raw: &str) -> String {
        let payload: Value = serde_json::from_str(&format!(r#"{{"n": {}}}"#, raw)).unwrap();
        let out = cleaned(payload);
        assert_eq!(out.len(), 1);
        out[0].1.clone()
    }

    #[test]
    fn test_is_value_not_empty() {
        assert!(!is_value_not_empty(&json!(null)));
        assert!(!is_value_not_empty(&json!("")));
        assert!(!is_value_not_empty(&json!(" \t\r\n ")));
        assert!(!is_value_not_empty(&json!([])));
        assert!(!is_value_not_empty(&json!({})));
        assert!(!is_value_not_empty(&json!([null, "  ", {}])));
        assert!(!is_value_not_empty(&json!({"a": null, "b": {"c": ""}})));

        assert!(is_value_not_empty(&json!(true)));
        assert!(is_value_not_empty(&json!(false)));
        assert!(is_value_not_empty(&json!(0)));
        assert!(is_value_not_empty(&json!(" x ")));
        assert!(is_value_not_empty(&json!([null, 0])));
        assert!(is_value_not_empty(&json!({"a": null, "b": false})));
    }

    #[test]
    fn test_clean_agrees_with_is_value_not_empty() {
        let payload = json!({
            "a": null, "b": "", "c": " \u{FEFF} ", "d": "\u{0085}",
            "e": false, "f": 0, "g": "x"
        });
        let flattened = flatten_payload(&payload).unwrap();
        let expected: Vec<String> = flattened
            .iter()
            .filter(|e| is_value_not_empty(&payload[e.path.as_str()]))
            .map(|e| e.path.clone())
            .collect();

        let kept: Vec<String> = clean_entries(flattened).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_clean_drops_empty_values() {
        let out = cleaned(json!({"a": null, "b": "", "c": "   ", "d": "\n", "e": "x"}));
        assert_eq!(out, vec![pair("e", "x")]);
    }

    #[test]
    fn test_clean_strips_all_whitespace() {
        let out = cleaned(json!({"s": "  A leading\n company\tproviding\r\n  "}));
        assert_eq!(out, vec![pair("s", "Aleadingcompanyproviding")]);
    }

    #[test]
    fn test_clean_uses_javascript_whitespace() {
        let out = cleaned(json!({
            "bom": "a\u{FEFF}b",
            "nel": "a\u{0085}b",
            "nbsp": "a\u{00A0}b\u{3000}c\u{2028}d"
        }));
        assert_eq!(
            out,
            vec![
                pair("bom", "ab"),
                pair("nbsp", "abcd"),
                pair("nel", "a\u{0085}b"),
            ]
        );

        assert!(!is_value_not_empty(&json!("\u{FEFF}")));
        assert!(is_value_not_empty(&json!("\u{0085}")));
    }

    #[test]
    fn test_clean_renders_booleans() {
        let out = cleaned(json!({"t": true, "f": false}));
        assert_eq!(out, vec![pair("f", "false"), pair("t", "true")]);
    }

    #[test]
    fn test_clean_renders_numbers() {
        let out = cleaned(json!({
            "zero": 0,
            "neg": -12,
            "big": 1722572118554u64,
            "half": 51.5,
            "whole": 2.0,
            "negzero": -0.0,
            "tiny": 0.25
        }));
        assert_eq!(
            out,
            vec![
                pair("big", "1722572118554"),
                pair("half", "51.5"),
                pair("neg", "-12"),
                pair("negzero", "0"),
                pair("tiny", "0.25"),
                pair("whole", "2"),
                pair("zero", "0"),
            ]
        );
    }

    #[test]
    fn test_clean_renders_numbers_like_javascript() {
        assert_eq!(number_text("1e15"), "1000000000000000");
        assert_eq!(number_text("1e20"), "100000000000000000000");
        assert_eq!(number_text("1e21"), "1e+21");
        assert_eq!(number_text("0.000001"), "0.000001");
        assert_eq!(number_text("1e-7"), "1e-7");
        assert_eq!(number_text("123456789012345680000"), "123456789012345680000");
        assert_eq!(number_text("-1.5e-9"), "-1.5e-9");
        assert_eq!(number_text("48.5"), "48.5");
    }

    #[test]
    fn test_clean_keeps_original_order() {
        let entries = vec![
            FlatEntry {
                path: "z".to_string(),
                value: Scalar::String("1"),
            },
            FlatEntry {
                path: "a".to_string(),
                value: Scalar::Null,
            },
            FlatEntry {
                path: "m".to_string(),
                value: Scalar::Bool(false),
            },
        ];
        assert_eq!(
            clean_entries(entries),
            vec![pair("z", "1"), pair("m", "false")]
        );
    }
}
