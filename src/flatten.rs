//! Graph flattening
//!
//! Builds the [`ViewModel`] in two passes over the provider's entities:
//!
//! 1. Forward: one [`EntityView`] per entity, its type index entries, and a
//!    `fwd` expansion for every property it states.
//! 2. Reverse: for every reference-shaped value that points at an entity in
//!    the view, the target's slot for that property gets a `rev` expansion.
//!
//! The reverse expansion is the *referencing* entity's whole property value
//! re-expanded, and the last referencing entity wins when several point at
//! the same target through the same property.

use std::collections::BTreeMap;

use crate::context::TermResolver;
use crate::entity::{as_array, extract_id, extract_types, reference_id, user_properties};
use crate::error::PreviewError;
use crate::expand::expand_property_value;
use crate::provider::EntityProvider;
use crate::view::{EntityView, PropertySlot, ViewModel};

/// Ensure `props` has a slot for `property` and return its canonical key
///
/// The first spelling of a property fixes the slot's `label`; `url` is
/// recomputed on every call:
///
/// - `None` when resolution left the name unchanged
/// - `#<id>` when the canonical identifier is itself an entity in the graph
/// - the canonical identifier otherwise
pub fn initialize_prop<P, R>(
    provider: &P,
    resolver: &R,
    props: &mut BTreeMap<String, PropertySlot>,
    property: &str,
) -> String
where
    P: EntityProvider + ?Sized,
    R: TermResolver + ?Sized,
{
    let uri = resolver.resolve_term(property);
    tracing::debug!("Resolved property '{}' to '{}'", property, uri);

    let url = if uri == property {
        None
    } else if provider.get(&uri).is_some() {
        Some(format!("#{}", uri))
    } else {
        Some(uri.clone())
    };

    let slot = props.entry(uri.clone()).or_insert_with(|| PropertySlot {
        label: property.to_string(),
        ..Default::default()
    });
    slot.url = url;

    uri
}

/// Flatten every entity of `provider` into a view model
///
/// Fails only if two entities share an @id.
pub fn flatten<P, R>(provider: &P, resolver: &R) -> Result<ViewModel, PreviewError>
where
    P: EntityProvider + ?Sized,
    R: TermResolver + ?Sized,
{
    let mut view = ViewModel {
        entry_point: provider.root_id().to_string(),
        ..Default::default()
    };

    // Forward pass
    for entity in provider.all() {
        let id = match extract_id(entity) {
            Some(id) => id,
            None => continue,
        };
        if view.ids.contains_key(id) {
            return Err(PreviewError::DuplicateEntityId(id.to_string()));
        }

        let types = extract_types(entity);
        for t in &types {
            view.types.entry(t.clone()).or_default().push(id.to_string());
        }

        let mut entity_view = EntityView {
            id: id.to_string(),
            types,
            props: BTreeMap::new(),
        };
        for (property, value) in user_properties(entity) {
            tracing::debug!("Processing property '{}' for entity '{}'", property, id);
            let uri = initialize_prop(provider, resolver, &mut entity_view.props, property);
            let fwd = expand_property_value(provider, property, value);
            if let Some(slot) = entity_view.props.get_mut(&uri) {
                slot.fwd = fwd;
            }
        }

        view.ids.insert(id.to_string(), entity_view);
    }

    // Reverse pass
    for entity in provider.all() {
        for (property, value) in user_properties(entity) {
            let uri = resolver.resolve_term(property);
            for element in as_array(value) {
                let target_id = match reference_id(element) {
                    Some(target_id) => target_id,
                    None => continue,
                };
                let target = match view.ids.get_mut(target_id) {
                    Some(target) => target,
                    None => continue,
                };
                let rev = expand_property_value(provider, property, value);
                let slot = target
                    .props
                    .entry(uri.clone())
                    .or_insert_with(|| PropertySlot {
                        label: property.to_string(),
                        ..Default::default()
                    });
                slot.rev = rev;
            }
        }
    }

    tracing::debug!(
        entities = view.ids.len(),
        types = view.types.len(),
        "Flattened crate"
    );

    Ok(view)
}

/// Flatten a provider that also resolves its own terms, such as a loaded [`Crate`]
///
/// [`Crate`]: crate::provider::Crate
pub fn crate_lite<C>(krate: &C) -> Result<ViewModel, PreviewError>
where
    C: EntityProvider + TermResolver + ?Sized,
{
    flatten(krate, krate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextResolver, IdentityResolver};
    use crate::provider::Crate;
    use crate::view::ValueRecord;
    use serde_json::{json, Value};

    const NAME: &str = "http://schema.org/name";
    const HAS_PART: &str = "http://schema.org/hasPart";

    /// Provider over a plain entity list, for graphs `Crate` would reject
    struct ListProvider(Vec<Value>);

    impl EntityProvider for ListProvider {
        fn root_id(&self) -> &str {
            "./"
        }

        fn all(&self) -> &[Value] {
            &self.0
        }

        fn get(&self, id: &str) -> Option<&Value> {
            self.0.iter().find(|e| extract_id(e) == Some(id))
        }
    }

    fn sample_crate() -> Crate {
        Crate::from_document(json!({
            "@context": "https://w3id.org/ro/crate/1.1/context",
            "@graph": [
                {
                    "@id": "ro-crate-metadata.json",
                    "@type": "CreativeWork",
                    "about": {"@id": "./"},
                    "conformsTo": {"@id": "https://w3id.org/ro/crate/1.1"}
                },
                {
                    "@id": "./",
                    "@type": "Dataset",
                    "name": "Root",
                    "hasPart": [{"@id": "a.txt"}, {"@id": "b.txt"}],
                    "license": {"@id": "https://creativecommons.org/licenses/by/4.0/"}
                },
                {"@id": "a.txt", "@type": "File", "name": "A"},
                {"@id": "b.txt", "@type": ["File", "TextDocument"]},
                {"@id": "#alice", "@type": "Person", "name": "Alice", "hasPart": {"@id": "b.txt"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_crate_lite_structure() {
        let mut krate = Crate::minimal();
        krate
            .add(
                "Dataset",
                "#test_dataset",
                json!({
                    "name": "Test Dataset",
                    "description": "A test dataset for testing crate_lite"
                }),
            )
            .unwrap();

        let lite = crate_lite(&krate).unwrap();
        assert_eq!(lite.entry_point, "./");
        assert!(lite.ids.contains_key("./"));
        assert!(lite.ids.contains_key("#test_dataset"));
        assert!(lite.types["Dataset"].contains(&"#test_dataset".to_string()));

        let test_dataset = &lite.ids["#test_dataset"];
        let name = &test_dataset.props[NAME];
        assert_eq!(name.label, "name");
        assert_eq!(name.url.as_deref(), Some(NAME));
        assert_eq!(name.fwd.records(), &[ValueRecord::literal(json!("Test Dataset"))]);
    }

    #[test]
    fn test_every_entity_appears_with_its_types() {
        let krate = sample_crate();
        let lite = crate_lite(&krate).unwrap();

        assert_eq!(lite.ids.len(), krate.len());
        for entity in krate.all() {
            let id = extract_id(entity).unwrap();
            assert_eq!(lite.ids[id].id, id);
            assert_eq!(lite.ids[id].types, extract_types(entity));
        }
        assert_eq!(lite.types["File"], vec!["a.txt", "b.txt"]);
        assert_eq!(lite.types["TextDocument"], vec!["b.txt"]);
        assert_eq!(lite.types["CreativeWork"], vec!["ro-crate-metadata.json"]);
    }

    #[test]
    fn test_forward_classification() {
        let krate = sample_crate();
        let lite = crate_lite(&krate).unwrap();
        let root = &lite.ids["./"];

        let parts = root.props[HAS_PART].fwd.records();
        assert_eq!(parts[0], ValueRecord::reference("a.txt", "A"));
        assert_eq!(parts[1], ValueRecord::reference("b.txt", "b.txt"));

        let license = root.props["http://schema.org/license"].fwd.records();
        assert_eq!(
            license,
            &[ValueRecord::link("https://creativecommons.org/licenses/by/4.0/")]
        );
    }

    #[test]
    fn test_reverse_reexpands_source_value() {
        let krate = sample_crate();
        let lite = crate_lite(&krate).unwrap();

        // a.txt is only referenced by the root, so its rev is the root's hasPart
        let a_rev = lite.ids["a.txt"].props[HAS_PART].rev.records();
        assert_eq!(
            a_rev,
            &[
                ValueRecord::reference("a.txt", "A"),
                ValueRecord::reference("b.txt", "b.txt")
            ]
        );
        let a_slot = &lite.ids["a.txt"].props[HAS_PART];
        assert!(a_slot.fwd.is_empty());
        assert_eq!(a_slot.url, None);
        assert_eq!(a_slot.label, "hasPart");

        // b.txt is referenced by the root and then #alice; the last one wins
        let b_rev = lite.ids["b.txt"].props[HAS_PART].rev.records();
        assert_eq!(b_rev, &[ValueRecord::reference("b.txt", "b.txt")]);
    }

    #[test]
    fn test_descriptor_about_gives_root_reverse_slot() {
        let krate = sample_crate();
        let lite = crate_lite(&krate).unwrap();

        let about = &lite.ids["./"].props["http://schema.org/about"];
        assert_eq!(about.rev.records(), &[ValueRecord::reference("./", "Root")]);

        // The descriptor itself is a regular entity of the view
        assert!(lite.ids.contains_key("ro-crate-metadata.json"));
    }

    #[test]
    fn test_reverse_pass_keeps_existing_forward_slot() {
        let krate = Crate::from_document(json!({
            "@context": "https://w3id.org/ro/crate/1.1/context",
            "@graph": [
                {"@id": "./", "@type": "Dataset", "name": "Root", "hasPart": {"@id": "sub/"}},
                {"@id": "sub/", "@type": "Dataset", "name": "Sub", "hasPart": {"@id": "sub/c.txt"}},
                {"@id": "sub/c.txt", "@type": "File", "name": "C"}
            ]
        }))
        .unwrap();
        let lite = crate_lite(&krate).unwrap();

        let slot = &lite.ids["sub/"].props[HAS_PART];
        assert_eq!(slot.label, "hasPart");
        assert_eq!(slot.url.as_deref(), Some(HAS_PART));
        assert_eq!(slot.fwd.records(), &[ValueRecord::reference("sub/c.txt", "C")]);
        assert_eq!(slot.rev.records(), &[ValueRecord::reference("sub/", "Sub")]);
    }

    #[test]
    fn test_idempotent() {
        let krate = sample_crate();
        assert_eq!(crate_lite(&krate).unwrap(), crate_lite(&krate).unwrap());
    }

    #[test]
    fn test_aliases_share_a_slot() {
        let krate = Crate::from_document(json!({
            "@context": [
                "https://w3id.org/ro/crate/1.1/context",
                {"schema": "http://schema.org/"}
            ],
            "@graph": [
                {"@id": "./", "@type": "Dataset", "name": "Short", "schema:name": "Prefixed"}
            ]
        }))
        .unwrap();
        let lite = crate_lite(&krate).unwrap();
        let root = &lite.ids["./"];

        assert_eq!(root.props.len(), 1);
        let slot = &root.props[NAME];
        assert_eq!(slot.label, "name");
        assert_eq!(slot.url.as_deref(), Some(NAME));
        assert_eq!(slot.fwd.records(), &[ValueRecord::literal(json!("Prefixed"))]);
    }

    #[test]
    fn test_property_url_rules() {
        let provider = ListProvider(vec![
            json!({"@id": "./", "@type": "Dataset", "customProp": "x", "http://example.org/p": "y"}),
            json!({"@id": "http://example.org/p", "@type": "rdf:Property", "name": "P"}),
        ]);
        let resolver = ContextResolver::from_context(&json!({"customProp": "http://example.org/custom"}));
        let lite = flatten(&provider, &resolver).unwrap();
        let root = &lite.ids["./"];

        assert_eq!(
            root.props["http://example.org/custom"].url.as_deref(),
            Some("http://example.org/custom")
        );
        // Already a full identifier: nothing was resolved
        assert_eq!(root.props["http://example.org/p"].url, None);

        let mut props = BTreeMap::new();
        let resolver = ContextResolver::from_context(&json!({"prop": "http://example.org/p"}));
        let uri = initialize_prop(&provider, &resolver, &mut props, "prop");
        assert_eq!(uri, "http://example.org/p");
        assert_eq!(props[&uri].url.as_deref(), Some("#http://example.org/p"));
    }

    #[test]
    fn test_identity_resolver_keeps_raw_keys() {
        let provider = ListProvider(vec![json!({"@id": "./", "name": "Root"})]);
        let lite = flatten(&provider, &IdentityResolver).unwrap();
        let slot = &lite.ids["./"].props["name"];
        assert_eq!(slot.url, None);
        assert_eq!(slot.fwd.records(), &[ValueRecord::literal(json!("Root"))]);
        assert!(lite.types.is_empty());
    }

    #[test]
    fn test_duplicate_ids_reported() {
        let provider = ListProvider(vec![
            json!({"@id": "./", "name": "one"}),
            json!({"@id": "./", "name": "two"}),
        ]);
        assert!(matches!(
            flatten(&provider, &IdentityResolver),
            Err(PreviewError::DuplicateEntityId(id)) if id == "./"
        ));
    }
}
