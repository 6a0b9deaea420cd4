//! Content-addressed identity keys
//!
//! Migration runs assign fresh stable identifiers on every attempt, so
//! identity for duplicate suppression has to come from object *content*.
//! Each object type projects its content fields into a JSON value and hashes
//! it; re-running a migration over unchanged source data reproduces the same
//! keys and the creation step can skip objects it has already written.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Generate a fresh migration-assigned stable identifier
///
/// Used as the target object's `uid`; distinct from any legacy identifier
/// and from the content key.
pub fn new_stable_uid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Hash a content projection into an opaque dedupe key
///
/// `serde_json::Map` keeps keys sorted, so equal projections serialize
/// identically regardless of construction order.
pub fn content_digest(projection: &Value) -> String {
    let canonical = serde_json::to_string(projection).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Project the named fields of a JSON object, skipping absent ones
pub(crate) fn project_fields(object: &Value, fields: &[&str]) -> Value {
    let mut projection = serde_json::Map::new();
    if let Some(map) = object.as_object() {
        for &field in fields {
            if let Some(value) = map.get(field) {
                projection.insert(field.to_string(), value.clone());
            }
        }
    }
    Value::Object(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digest_ignores_construction_order() {
        let a = json!({"start": "2026-01-01T00:00:00", "title": "t"});
        let b = json!({"title": "t", "start": "2026-01-01T00:00:00"});
        assert_eq!(content_digest(&a), content_digest(&b));
    }

    #[test]
    fn test_projection_skips_absent_fields() {
        let obj = json!({"title": "t", "uid": "u1"});
        let projected = project_fields(&obj, &["title", "start"]);
        assert_eq!(projected, json!({"title": "t"}));
    }
}
