// ⚖️ Array Reconciliation - Diff and merge row collections by identity
// compare_arrays_of_objects_with_id computes the create/update/delete set
// that turns one collection into another; merge_by_id folds edited rows
// back over the originals.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// CHANGE SET
// ============================================================================

/// What has to happen to a row for the base collection to become the
/// updated one. Serializes as the lowercase verb the persistence layer
/// dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    #[serde(rename = "create")]
    Created,
    #[serde(rename = "update")]
    Updated,
    #[serde(rename = "delete")]
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub action: ChangeAction,
    pub payload: Value,
}

// ============================================================================
// COMPARE
// ============================================================================

/// Diff two ordered collections of objects by their `id` field.
///
/// Rows present only in `base` come out as deletes (payload: the base
/// row), rows present in both but not deep-equal come out as updates
/// (payload: the updated row), rows present only in `updated` come out as
/// creates. Deep-equal collections produce no changes at all. Two rows
/// that both lack an `id` match each other.
///
/// The result is insertion-ordered and free of duplicates: deletes and
/// updates in base order, then creates in updated order.
pub fn compare_arrays_of_objects_with_id(base: &[Value], updated: &[Value]) -> Vec<Change> {
    let mut changes = Vec::new();

    if base == updated {
        return changes;
    }

    for current in base {
        match updated.iter().find(|el| id_of(el) == id_of(current)) {
            None => changes.push(Change {
                action: ChangeAction::Deleted,
                payload: current.clone(),
            }),
            Some(counterpart) => {
                if counterpart != current {
                    changes.push(Change {
                        action: ChangeAction::Updated,
                        payload: counterpart.clone(),
                    });
                }
            }
        }
    }

    for current in updated {
        if !base.iter().any(|el| id_of(el) == id_of(current)) {
            changes.push(Change {
                action: ChangeAction::Created,
                payload: current.clone(),
            });
        }
    }

    debug!(changes = changes.len(), "compared collections");
    changes
}

/// Raw `id` value of a row. Absent ids compare equal to each other and to
/// nothing else.
fn id_of(value: &Value) -> Option<&Value> {
    value.get("id")
}

// ============================================================================
// MERGE
// ============================================================================

/// Fold an incoming collection over an existing one by `id`.
///
/// Incoming rows whose id matches an existing row shallow-merge over it in
/// place, keeping its position; rows with no usable id, or an unknown one,
/// append at the end in incoming order.
pub fn merge_by_id(existing: &[Value], incoming: &[Value]) -> Vec<Value> {
    let mut combined: Vec<Value> = existing.to_vec();

    for item in incoming {
        let Some(id) = usable_id(item) else {
            combined.push(item.clone());
            continue;
        };

        match combined.iter_mut().find(|el| usable_id(el) == Some(id)) {
            Some(target) => shallow_merge(target, item),
            None => combined.push(item.clone()),
        }
    }

    combined
}

/// An id counts only when it is a non-empty string; rows the user has not
/// persisted yet come through without one.
fn usable_id(value: &Value) -> Option<&str> {
    match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}

/// Field-level overwrite of `target` with the incoming row's entries.
/// Fields the incoming row does not carry keep their existing values.
fn shallow_merge(target: &mut Value, incoming: &Value) {
    if let (Value::Object(fields), Value::Object(patch)) = (target, incoming) {
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
