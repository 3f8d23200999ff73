//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge `overlay` into `base`. Objects merge key by key; every other value
/// (arrays included) is replaced wholesale.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_scalars_replace() {
        let mut base = json!({ "generation": { "question_count": 5, "strict_shape": false } });
        merge_json_values(&mut base, &json!({ "generation": { "strict_shape": true } }));
        assert_eq!(
            base,
            json!({ "generation": { "question_count": 5, "strict_shape": true } })
        );
    }
}
