//! Canonical ordering and serialization of cleaned entries.
//!
//! The canonical string is `key=value` pairs joined by `&`, sorted by key
//! bytes, with both sides percent-encoded using the JavaScript
//! `encodeURIComponent` character set. Encoding keeps a raw `&` or `=`
//! inside a value from being read as a separator.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is by `encodeURIComponent`; everything else is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Sort entries ascending by key, comparing raw UTF-8 bytes.
pub fn sort_entries(mut entries: Vec<(String, String)>) -> Vec<(String, String)> {
    entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    entries
}

/// Render sorted entries as `k1=v1&k2=v2`.
pub fn serialize_entries(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}
