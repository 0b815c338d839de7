//! Value expansion
//!
//! Classifies each value of a property as a literal, a reference to an
//! entity in the graph, or a link to something outside it.

use serde_json::Value;
use url::Url;

use crate::entity::{as_array, display_name, reference_id};
use crate::provider::EntityProvider;
use crate::view::{Expansion, ValueRecord};
use crate::vocab::{ID_KEY, METADATA_DESCRIPTOR_ID, VALUE_KEY};

/// Expand the value(s) of `property` into classified records
///
/// `@id` and `@value` are structural and pass through unchanged. For any
/// other property each element becomes one record, in input order:
///
/// - `{"@id": ...}` naming an entity in the graph: a reference record
/// - `{"@id": ...}` holding an absolute URL not in the graph: a link record
/// - anything else: a literal record wrapping the element as-is
///
/// References to the metadata descriptor are dropped, as are records that
/// end up with nothing in them.
pub fn expand_property_value<P>(provider: &P, property: &str, value: &Value) -> Expansion
where
    P: EntityProvider + ?Sized,
{
    if property == ID_KEY || property == VALUE_KEY {
        return Expansion::Raw(value.clone());
    }

    let records = as_array(value)
        .into_iter()
        .filter_map(|element| expand_element(provider, property, element))
        .filter(|record| !record.is_empty())
        .collect();

    Expansion::Records(records)
}

fn expand_element<P>(provider: &P, property: &str, element: &Value) -> Option<ValueRecord>
where
    P: EntityProvider + ?Sized,
{
    let id = match reference_id(element) {
        Some(id) => id,
        None => return Some(ValueRecord::literal(element.clone())),
    };

    if id == METADATA_DESCRIPTOR_ID {
        tracing::debug!("Dropping reference to metadata descriptor in '{}'", property);
        return None;
    }

    if let Some(target) = provider.get(id) {
        let name = display_name(target).unwrap_or_else(|| id.to_string());
        return Some(ValueRecord::reference(id, name));
    }

    if is_absolute_url(id) {
        Some(ValueRecord::link(id))
    } else {
        tracing::debug!("Treating unresolved @id '{}' in '{}' as a literal", id, property);
        Some(ValueRecord::literal(element.clone()))
    }
}

/// Whether an @id is an absolute URL with both a scheme and a host
pub fn is_absolute_url(id: &str) -> bool {
    match Url::parse(id) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}
