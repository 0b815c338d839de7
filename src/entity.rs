//! Helpers over raw JSON-LD entities
//!
//! Entities are kept as the `serde_json::Value` objects found in the
//! crate's @graph; these functions give typed access to the parts the
//! flattener needs.

use serde_json::Value;

use crate::vocab::{ID_KEY, NAME_KEY, TYPE_KEY, VALUE_KEY};

/// Extract @id from an entity
pub fn extract_id(entity: &Value) -> Option<&str> {
    entity.get(ID_KEY).and_then(|v| v.as_str())
}

/// Extract @type as a list of type names
pub fn extract_types(entity: &Value) -> Vec<String> {
    match entity.get(TYPE_KEY) {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(arr)) => arr
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => vec![],
    }
}

/// View a property value as a sequence
///
/// Arrays are borrowed element-wise, null becomes empty and anything else
/// is a single-element sequence.
pub fn as_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => vec![],
        Value::Array(arr) => arr.iter().collect(),
        other => vec![other],
    }
}

/// The @id of a reference-shaped value (`{"@id": "..."}` with possibly more keys)
pub fn reference_id(value: &Value) -> Option<&str> {
    match value {
        Value::Object(obj) => obj.get(ID_KEY).and_then(|id| id.as_str()),
        _ => None,
    }
}

/// Properties of an entity other than @id and @type, in authored order
pub fn user_properties(entity: &Value) -> impl Iterator<Item = (&String, &Value)> {
    entity
        .as_object()
        .into_iter()
        .flat_map(|obj| obj.iter())
        .filter(|(key, _)| *key != ID_KEY && *key != TYPE_KEY)
}

/// Display name of an entity: its `name` values joined with ", "
///
/// Returns `None` when the entity has no usable name.
pub fn display_name(entity: &Value) -> Option<String> {
    let names: Vec<String> = entity
        .get(NAME_KEY)
        .map(as_array)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Object(obj) => obj
                .get(VALUE_KEY)
                .and_then(|v| v.as_str())
                .map(String::from),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}
