//! View model produced by flattening a crate
//!
//! Every entity's properties are keyed by canonical identifier and every
//! value is pre-classified, so templates never have to deal with JSON-LD
//! shapes directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The flattened crate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    /// @id of the root entity
    #[serde(rename = "entryPoint")]
    pub entry_point: String,
    /// Every entity, by @id
    pub ids: BTreeMap<String, EntityView>,
    /// Entity @ids per type label, in enumeration order
    pub types: BTreeMap<String, Vec<String>>,
}

/// One entity of the view model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityView {
    pub id: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Property slots keyed by canonical property identifier
    pub props: BTreeMap<String, PropertySlot>,
}

/// Forward and reverse values of one property on one entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySlot {
    /// Property name as first encountered
    pub label: String,
    /// Where the property itself links to, if it was resolved
    pub url: Option<String>,
    pub fwd: Expansion,
    pub rev: Expansion,
}

/// Result of expanding a property value
///
/// Structural keys (`@id`, `@value`) pass through untouched; everything else
/// becomes a list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expansion {
    Records(Vec<ValueRecord>),
    Raw(Value),
}

impl Default for Expansion {
    fn default() -> Self {
        Expansion::Records(Vec::new())
    }
}

impl Expansion {
    /// The expanded records; empty for a pass-through value
    pub fn records(&self) -> &[ValueRecord] {
        match self {
            Expansion::Records(records) => records,
            Expansion::Raw(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Expansion::Records(records) => records.is_empty(),
            Expansion::Raw(value) => value.is_null(),
        }
    }
}

/// A single classified value
///
/// Exactly one of `value`, `target_id` (with `target_name`) or `url` is
/// set; the others stay empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub value: Value,
    pub target_id: String,
    pub target_name: String,
    pub url: String,
}

impl Default for ValueRecord {
    fn default() -> Self {
        Self {
            value: Value::String(String::new()),
            target_id: String::new(),
            target_name: String::new(),
            url: String::new(),
        }
    }
}

impl ValueRecord {
    pub fn literal(value: Value) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn reference(target_id: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            target_name: target_name.into(),
            ..Self::default()
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A record with nothing in it: no truthy literal, no target and no link
    ///
    /// `false` and zero count as no literal.
    pub fn is_empty(&self) -> bool {
        let no_value = match &self.value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(arr) => arr.is_empty(),
            Value::Object(obj) => obj.is_empty(),
        };
        no_value && self.target_id.is_empty() && self.url.is_empty()
    }
}

/// Serialize a view model to a JSON string
pub fn to_json_string(view: &ViewModel, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(view)
    } else {
        serde_json::to_string(view)
    }
}
