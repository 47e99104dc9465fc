//! Recursive merge of JSON values.
use serde_json::Value;

/// Deep-merge `incoming` into `base`.
///
/// Nested mappings are merged key by key. Anything else in `incoming`
/// (scalars, arrays, `null`) replaces whatever `base` holds at that path.
pub fn deep_merge(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, incoming) => *base = incoming,
    }
}
