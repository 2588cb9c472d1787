use crate::error::CoreError;
use crate::hash::DecisionId;
use serde::Serialize;

/// Produce a canonical byte representation: `tag\0sorted_json`.
///
/// Keys are sorted recursively so the same value always yields the same
/// bytes, whatever the field declaration or map insertion order.
pub fn canonical_serialize(tag: &str, value: &impl Serialize) -> Result<Vec<u8>, CoreError> {
    let json_value = serde_json::to_value(value)?;
    let sorted_json = serde_json::to_string(&sort_value(json_value))?;
    let mut buf = Vec::with_capacity(tag.len() + 1 + sorted_json.len());
    buf.extend_from_slice(tag.as_bytes());
    buf.push(0);
    buf.extend_from_slice(sorted_json.as_bytes());
    Ok(buf)
}

/// Derive a DecisionId from a tagged value and a caller-chosen salt.
///
/// The salt keeps two otherwise identical drafts (same collection, same
/// instant) from colliding.
pub fn salted_id(tag: &str, value: &impl Serialize, salt: u64) -> Result<DecisionId, CoreError> {
    Ok(DecisionId::derive(&canonical_serialize(tag, value)?, salt))
}

fn sort_value(v: serde_json::Value) -> serde_json::Value {
    match v {
        serde_json::Value::Object(map) => {
            let sorted: serde_json::Map<String, serde_json::Value> = map
                .into_iter()
                .map(|(k, v)| (k, sort_value(v)))
                .collect::<std::collections::BTreeMap<_, _>>()
                .into_iter()
                .collect();
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(sort_value).collect())
        }
        other => other,
    }
}
