//! Canonical SHA-256 fingerprints
//!
//! Used to tag a loaded library and an engine configuration so that hit
//! samples produced by different runs can be traced back to exactly the
//! inputs that made them. Object keys are sorted before hashing, so two
//! values that serialize to the same JSON modulo key order share a digest.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Hex SHA-256 of the canonical JSON form of `value`
///
/// # Example
/// ```
/// use hf_shower_core_rs::core::fingerprint::compute_fingerprint;
/// use std::collections::HashMap;
///
/// let mut a = HashMap::new();
/// a.insert("x", 1);
/// a.insert("y", 2);
/// let digest = compute_fingerprint(&a).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_matter() {
        let a = json!({"bins": 16, "per_bin": 5000, "nested": {"b": 1, "a": 2}});
        let b = json!({"nested": {"a": 2, "b": 1}, "per_bin": 5000, "bins": 16});
        assert_eq!(compute_fingerprint(&a).unwrap(), compute_fingerprint(&b).unwrap());
    }

    #[test]
    fn test_different_values_differ() {
        let a = json!({"bins": 16});
        let b = json!({"bins": 17});
        assert_ne!(compute_fingerprint(&a).unwrap(), compute_fingerprint(&b).unwrap());
    }
}
