//! Deterministic cache key derivation
//!
//! Keys are a SHA-256 over `{operation, params}` after canonicalization:
//! object keys are sorted and array elements are ordered by their
//! serialized form, so semantically identical requests collide regardless
//! of the client-side ordering they arrived with.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Derive the cache key for an operation and its normalized parameters
#[must_use]
pub fn cache_key(operation: &str, params: &Value) -> String {
    let canonical = canonicalize(params);
    let payload = serde_json::json!({
        "operation": operation,
        "params": canonical,
    });

    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Recursively canonicalize a JSON value.
///
/// `serde_json::Map` already iterates keys in sorted order; arrays are
/// sorted by the serialization of their canonicalized elements.
#[must_use]
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect(),
        ),
        Value::Array(items) => {
            let mut canonical: Vec<Value> = items.iter().map(canonicalize).collect();
            canonical.sort_by_key(|v| v.to_string());
            Value::Array(canonical)
        }
        other => other.clone(),
    }
}
