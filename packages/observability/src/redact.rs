//! Redaction of credential-like log fields.

use serde_json::{Map, Value};

const REDACTED: &str = "[REDACTED]";
const MAX_STRING_LEN: usize = 512;

const DENYLIST_KEYS: [&str; 8] = [
    "token",
    "id_token",
    "refresh_token",
    "authorization",
    "cookie",
    "password",
    "secret",
    "api_key",
];

/// Redact a single value, recursing into objects and arrays.
pub fn redact_value(key: &str, value: &Value) -> Value {
    if is_sensitive_key(key) {
        return Value::String(REDACTED.to_string());
    }

    match value {
        Value::String(s) => redact_string(s),
        Value::Object(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(k.clone(), redact_value(k, v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| redact_value(key, item)).collect()),
        _ => value.clone(),
    }
}

/// Redact a free-form message. Only bearer headers are caught here since
/// messages routinely contain dotted identifiers.
pub(crate) fn redact_message(message: &str) -> String {
    match message.to_ascii_lowercase().find("bearer ") {
        Some(idx) => format!("{}Bearer {}", &message[..idx], REDACTED),
        None => message.to_string(),
    }
}

fn redact_string(raw: &str) -> Value {
    if looks_like_credential(raw) {
        return Value::String(REDACTED.to_string());
    }
    if raw.len() > MAX_STRING_LEN {
        return Value::String(format!("[TRUNCATED:len={}]", raw.len()));
    }
    Value::String(raw.to_string())
}

fn looks_like_credential(raw: &str) -> bool {
    if raw.to_ascii_lowercase().starts_with("bearer ") {
        return true;
    }
    // JWT shape: header.payload.signature
    if raw.matches('.').count() == 2 && raw.len() > 40 && !raw.contains(' ') {
        return true;
    }
    is_long_base64(raw)
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    DENYLIST_KEYS.iter().any(|entry| lower.contains(entry))
}

fn is_long_base64(value: &str) -> bool {
    value.len() > 48
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '_' | '-'))
}
