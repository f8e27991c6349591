// 🧩 Object Flattening - Nested JSON to dotted-path maps and back
// Flattens arbitrary nesting into "a.b[0].c" keys for form bindings and
// field-level diffing; unflatten_object rebuilds the original shape.

use serde_json::{Map, Value};

// ============================================================================
// FLATTEN
// ============================================================================

/// Flatten a nested structure into a single-level map keyed by
/// dotted-path/bracket-index strings.
///
/// Scalars map to `prefix -> value`; objects recurse with `prefix.key`
/// (bare `key` at the root); arrays recurse with `prefix[index]`. Null is
/// kept as a value unless `keep_null` is false. Keys come out in traversal
/// order.
pub fn flatten_object(value: &Value, prefix: &str, keep_null: bool) -> Map<String, Value> {
    let mut result = Map::new();
    flatten_into(value, prefix, keep_null, &mut result);
    result
}

fn flatten_into(value: &Value, prefix: &str, keep_null: bool, result: &mut Map<String, Value>) {
    match value {
        Value::Null => {
            if keep_null {
                result.insert(prefix.to_string(), Value::Null);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            result.insert(prefix.to_string(), value.clone());
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, &format!("{}[{}]", prefix, index), keep_null, result);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(item, &child, keep_null, result);
            }
        }
    }
}

// ============================================================================
// UNFLATTEN
// ============================================================================

/// Rebuild a nested structure from a flat dotted-path map.
///
/// Each key splits on `.`, `[` and `]`; a segment followed by an all-digit
/// segment becomes an array (missing indices pad with null). When every
/// top-level key is an index the result itself is an array.
pub fn unflatten_object(flat: &Map<String, Value>) -> Value {
    let mut root = Value::Object(Map::new());

    for (key, value) in flat {
        let parts = split_path(key);
        if parts.is_empty() {
            continue;
        }
        insert_path(&mut root, &parts, value.clone());
    }

    // A map keyed entirely by indices came from an array
    if let Value::Object(fields) = &root {
        if fields.keys().all(|key| is_index(key)) {
            let items: Vec<Value> = fields.values().cloned().collect();
            return Value::Array(items);
        }
    }

    root
}

fn split_path(key: &str) -> Vec<&str> {
    key.split(|c: char| matches!(c, '.' | '[' | ']'))
        .filter(|part| !part.is_empty())
        .collect()
}

fn is_index(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit())
}

fn insert_path(root: &mut Value, parts: &[&str], value: Value) {
    let mut current = root;

    for window in parts.windows(2) {
        current = descend(current, window[0], is_index(window[1]));
    }

    set_slot(current, parts[parts.len() - 1], value);
}

/// Step one segment deeper, materializing the child container when the
/// slot is empty (or holds the null an array pad left behind).
fn descend<'a>(current: &'a mut Value, part: &str, next_is_index: bool) -> &'a mut Value {
    let empty_child = || {
        if next_is_index {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        }
    };

    match current {
        Value::Object(fields) => {
            let slot = fields.entry(part.to_string()).or_insert_with(empty_child);
            if !slot.is_object() && !slot.is_array() {
                *slot = empty_child();
            }
            slot
        }
        Value::Array(items) => {
            let index: usize = part.parse().unwrap_or(0);
            while items.len() <= index {
                items.push(Value::Null);
            }
            let slot = &mut items[index];
            if !slot.is_object() && !slot.is_array() {
                *slot = empty_child();
            }
            slot
        }
        // A scalar in the path's way; nothing sensible to descend into
        other => other,
    }
}

fn set_slot(container: &mut Value, part: &str, value: Value) {
    match container {
        Value::Object(fields) => {
            fields.insert(part.to_string(), value);
        }
        Value::Array(items) => {
            if let Ok(index) = part.parse::<usize>() {
                while items.len() <= index {
                    items.push(Value::Null);
                }
                items[index] = value;
            }
        }
        _ => {}
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_flatten_simple_object() {
        let obj = json!({ "a": 1, "b": 2 });

        let flat = flatten_object(&obj, "", true);

        assert_eq!(Value::Object(flat), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_flatten_nested_object() {
        let obj = json!({ "a": 1, "b": { "c": 2 } });

        let flat = flatten_object(&obj, "", true);

        assert_eq!(Value::Object(flat), json!({ "a": 1, "b.c": 2 }));
    }

    #[test]
    fn test_flatten_array() {
        let arr = json!([1, 2, [3, 4]]);

        let flat = flatten_object(&arr, "", true);

        assert_eq!(
            Value::Object(flat),
            json!({ "[0]": 1, "[1]": 2, "[2][0]": 3, "[2][1]": 4 })
        );
    }

    #[test]
    fn test_flatten_drops_null_when_asked() {
        let obj = json!({ "a": 1, "b": null, "c": { "d": 2, "e": null } });

        let flat = flatten_object(&obj, "", false);

        assert_eq!(Value::Object(flat), json!({ "a": 1, "c.d": 2 }));
    }

    #[test]
    fn test_flatten_respects_prefix() {
        let obj = json!({ "amount": 100 });

        let flat = flatten_object(&obj, "rows[0]", true);

        assert_eq!(Value::Object(flat), json!({ "rows[0].amount": 100 }));
    }

    #[test]
    fn test_unflatten_simple_object() {
        let flat = as_map(json!({ "a": 1, "b": 2 }));

        assert_eq!(unflatten_object(&flat), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_unflatten_nested_object() {
        let flat = as_map(json!({ "a": 1, "b.c": 2 }));

        assert_eq!(unflatten_object(&flat), json!({ "a": 1, "b": { "c": 2 } }));
    }

    #[test]
    fn test_unflatten_array() {
        let flat = as_map(json!({ "[0]": 1, "[1]": 2, "[2][0]": 3, "[2][1]": 4 }));

        assert_eq!(unflatten_object(&flat), json!([1, 2, [3, 4]]));
    }

    #[test]
    fn test_unflatten_preserves_null() {
        let flat = as_map(json!({ "a": 1, "b": null, "c.d": 2, "c.e": null }));

        assert_eq!(
            unflatten_object(&flat),
            json!({ "a": 1, "b": null, "c": { "d": 2, "e": null } })
        );
    }

    #[test]
    fn test_round_trip_nested_structure() {
        let original = json!({
            "contract": {
                "tenant": "ACME",
                "cycles": [
                    { "initialMonth": 1, "finalMonth": 9, "amount": 1000 },
                    { "initialMonth": 10, "finalMonth": 12, "amount": 500 },
                ],
            },
            "notes": null,
        });

        let flat = flatten_object(&original, "", true);
        assert_eq!(flat["contract.cycles[1].amount"], json!(500));

        assert_eq!(unflatten_object(&flat), original);
    }

    #[test]
    fn test_round_trip_array_of_objects() {
        let original = json!([{ "a": [true, false] }, { "b": "x" }]);

        let flat = flatten_object(&original, "", true);

        assert_eq!(unflatten_object(&flat), original);
    }
}
