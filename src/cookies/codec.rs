//! Cookie header decoding and setter-string encoding.
//!
//! The read side works on the script-visible header (`a=1; b=%7B%7D`), the
//! write side produces one setter string per cookie
//! (`a=1; max-age=60; path=/; secure; samesite=Lax`).

use crate::cookies::canonicalcookie::{CookieAttributes, Expiry};
use crate::cookies::snapshot::Snapshot;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

/// Characters left untouched by `encodeURIComponent`.
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

/// Separator between cookies in the header and between setter fields.
pub const SEPARATOR: &str = "; ";

/// Default cookie path when a write does not name one.
pub const DEFAULT_PATH: &str = "/";

/// Decode a raw cookie header into a [`Snapshot`].
pub fn decode(raw: &str) -> Snapshot {
    let mut entries = Map::new();
    if raw.is_empty() {
        return Snapshot::from_map(entries);
    }

    for segment in raw.split(SEPARATOR) {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        let name = percent_decode(name);
        let value = decode_value(&percent_decode(value));
        // IndexMap keeps the first position on overwrite.
        entries.insert(name, value);
    }

    Snapshot::from_map(entries)
}

/// Speculatively parse a decoded cookie value as JSON.
pub fn decode_value(decoded: &str) -> Value {
    match serde_json::from_str(decoded) {
        Ok(value) => value,
        Err(_) => {
            tracing::trace!(value = %decoded, "cookie value is not JSON, keeping string");
            Value::String(decoded.to_string())
        }
    }
}

/// Encode a cookie write into a setter string, using `/` as the default path.
pub fn encode(name: &str, value: &str, attrs: &CookieAttributes) -> String {
    encode_with_default_path(name, value, attrs, DEFAULT_PATH)
}

/// Encode a cookie write, falling back to `default_path` when `attrs.path` is absent.
pub fn encode_with_default_path(
    name: &str,
    value: &str,
    attrs: &CookieAttributes,
    default_path: &str,
) -> String {
    let mut fields = vec![format!("{}={}", name, percent_encode(value))];

    match &attrs.expires {
        Some(Expiry::MaxAge(secs)) => fields.push(format!("max-age={}", secs)),
        Some(Expiry::Expires(date)) => fields.push(format!("expires={}", date)),
        None => {}
    }

    let path = attrs.path.as_deref().unwrap_or(default_path);
    fields.push(format!("path={}", path));

    if let Some(domain) = &attrs.domain {
        fields.push(format!("domain={}", domain));
    }

    // The Secure attribute has no meaningful value; browsers treat
    // `secure=false` as secure, so false is simply omitted.
    if attrs.secure {
        fields.push("secure".to_string());
    }

    if let Some(same_site) = attrs.same_site {
        fields.push(format!("samesite={}", same_site));
    }

    fields.join(SEPARATOR)
}

pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// JavaScript-style string coercion of a decoded cookie value.
///
/// Used to compare a stored value against the raw value carried by a
/// change notification.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e21 {
                    format!("{:.0}", f)
                } else {
                    f.to_string()
                }
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
