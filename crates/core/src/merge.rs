use serde_json::{Map, Value as JsonValue};

/// Recursively merges `incoming` into `existing` and returns the result.
///
/// Nested mappings present on both sides are merged key by key. Any other
/// incoming value, sequences included, replaces what was there.
pub fn deep_merge(
    mut existing: Map<String, JsonValue>,
    incoming: Map<String, JsonValue>,
) -> Map<String, JsonValue> {
    merge_into(&mut existing, incoming);
    existing
}

fn merge_into(target: &mut Map<String, JsonValue>, incoming: Map<String, JsonValue>) {
    for (key, value) in incoming {
        match value {
            JsonValue::Object(nested) => {
                if let Some(JsonValue::Object(current)) = target.get_mut(&key) {
                    merge_into(current, nested);
                } else {
                    target.insert(key, JsonValue::Object(nested));
                }
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn merged(existing: JsonValue, incoming: JsonValue) -> JsonValue {
        JsonValue::Object(deep_merge(map(existing), map(incoming)))
    }

    #[test]
    fn adds_new_keys() {
        assert_eq!(
            merged(json!({ "author": "A" }), json!({ "title": "Hello" })),
            json!({ "author": "A", "title": "Hello" })
        );
    }

    #[test]
    fn merges_nested_mappings() {
        assert_eq!(
            merged(
                json!({ "site": { "name": "x", "nav": { "home": "/" } } }),
                json!({ "site": { "nav": { "docs": "/docs" } } })
            ),
            json!({ "site": { "name": "x", "nav": { "home": "/", "docs": "/docs" } } })
        );
    }

    #[test]
    fn incoming_scalars_and_sequences_overwrite() {
        assert_eq!(
            merged(
                json!({ "tags": ["a", "b"], "meta": { "x": 1 }, "n": 1 }),
                json!({ "tags": ["c"], "meta": "flat", "n": { "deep": true } })
            ),
            json!({ "tags": ["c"], "meta": "flat", "n": { "deep": true } })
        );
    }

    #[test]
    fn empty_incoming_is_identity() {
        let existing = json!({ "a": { "b": [1, 2] } });
        assert_eq!(merged(existing.clone(), json!({})), existing);
    }
}
