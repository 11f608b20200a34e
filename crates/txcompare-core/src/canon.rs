//! Canonical form and equality for JSON documents.
//!
//! Object key order carries no meaning in the compared documents, so every
//! object is rebuilt with its keys sorted. Array order is preserved.
//! [`canonical_eq`] is the only notion of equality used by the categorizer
//! and the diff extractor.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Return a copy of `value` with every object's keys sorted, recursively.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Compact serialization of the canonical form.
pub fn canonical_string(value: &Value) -> String {
    canonicalize(value).to_string()
}

/// Structural equality modulo object key order.
pub fn canonical_eq(a: &Value, b: &Value) -> bool {
    canonical_string(a) == canonical_string(b)
}

/// Hex SHA-256 of the canonical serialization.
pub fn canonical_digest(value: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_string(value).as_bytes());
    hex::encode(hasher.finalize())
}
