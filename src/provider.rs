//! In-memory entity provider for an RO-Crate metadata document
//!
//! Holds the crate's @graph in authored order together with an @id index,
//! and exposes it to the flattener through [`EntityProvider`].

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::context::{ContextResolver, TermResolver};
use crate::entity::{extract_id, reference_id};
use crate::error::PreviewError;
use crate::vocab::{
    is_metadata_descriptor_id, ID_KEY, METADATA_DESCRIPTOR_ID, ROCRATE_CONTEXT_1_1,
    ROCRATE_PROFILE_1_1, ROOT_ENTITY_ID, TYPE_KEY,
};

/// Read access to the entities of a loaded graph
pub trait EntityProvider {
    /// @id of the graph's entry entity
    fn root_id(&self) -> &str;

    /// All entities, in a stable enumeration order
    fn all(&self) -> &[Value];

    /// Look up an entity by @id
    fn get(&self, id: &str) -> Option<&Value>;
}

/// A loaded RO-Crate: context, graph and lookup index
#[derive(Debug, Clone)]
pub struct Crate {
    context: Value,
    graph: Vec<Value>,
    index: HashMap<String, usize>,
    root_id: String,
    resolver: ContextResolver,
}

impl Crate {
    /// Build a crate from a parsed metadata document
    pub fn from_document(document: Value) -> Result<Self, PreviewError> {
        let mut document = match document {
            Value::Object(obj) => obj,
            _ => {
                return Err(PreviewError::InvalidStructure(
                    "metadata document is not a JSON object".to_string(),
                ))
            }
        };

        let context = document.remove("@context").unwrap_or(Value::Null);
        let entities = match document.remove("@graph") {
            Some(Value::Array(entities)) => entities,
            Some(_) => {
                return Err(PreviewError::InvalidStructure(
                    "@graph is not an array".to_string(),
                ))
            }
            None => {
                return Err(PreviewError::InvalidStructure(
                    "document has no @graph".to_string(),
                ))
            }
        };

        let mut graph = Vec::with_capacity(entities.len());
        let mut index = HashMap::new();
        for entity in entities {
            let id = match extract_id(&entity) {
                Some(id) => id.to_string(),
                None => {
                    tracing::warn!("Skipping graph member without a string @id");
                    continue;
                }
            };
            if index.insert(id.clone(), graph.len()).is_some() {
                return Err(PreviewError::DuplicateEntityId(id));
            }
            graph.push(entity);
        }

        let root_id = find_root_id(&graph, &index).ok_or(PreviewError::MissingRootEntity)?;
        let resolver = ContextResolver::from_context(&context);

        tracing::debug!(
            entities = graph.len(),
            root = %root_id,
            "Indexed crate graph"
        );

        Ok(Self {
            context,
            graph,
            index,
            root_id,
            resolver,
        })
    }

    /// Parse a metadata document from its JSON text
    ///
    /// `source` is only used to label errors.
    pub fn from_json_str(content: &str, source: &str) -> Result<Self, PreviewError> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| PreviewError::LoadError {
                path: source.to_string(),
                reason: format!("Failed to parse RO-Crate metadata: {}", e),
            })?;
        Self::from_document(document)
    }

    /// A minimal RO-Crate 1.1: the metadata descriptor and an empty root Dataset
    pub fn minimal() -> Self {
        let graph = vec![
            json!({
                "@id": METADATA_DESCRIPTOR_ID,
                "@type": "CreativeWork",
                "about": {"@id": ROOT_ENTITY_ID},
                "conformsTo": {"@id": ROCRATE_PROFILE_1_1}
            }),
            json!({
                "@id": ROOT_ENTITY_ID,
                "@type": "Dataset"
            }),
        ];
        let index = graph
            .iter()
            .enumerate()
            .filter_map(|(pos, e)| extract_id(e).map(|id| (id.to_string(), pos)))
            .collect();
        let context = json!(ROCRATE_CONTEXT_1_1);

        Self {
            resolver: ContextResolver::from_context(&context),
            context,
            graph,
            index,
            root_id: ROOT_ENTITY_ID.to_string(),
        }
    }

    /// Append an entity with the given type, @id and properties
    pub fn add(
        &mut self,
        entity_type: &str,
        id: &str,
        props: Value,
    ) -> Result<&Value, PreviewError> {
        if self.index.contains_key(id) {
            return Err(PreviewError::DuplicateEntityId(id.to_string()));
        }

        let mut entity = Map::new();
        entity.insert(ID_KEY.to_string(), json!(id));
        entity.insert(TYPE_KEY.to_string(), json!(entity_type));
        if let Value::Object(props) = props {
            for (key, value) in props {
                if key != ID_KEY && key != TYPE_KEY {
                    entity.insert(key, value);
                }
            }
        }

        let pos = self.graph.len();
        self.index.insert(id.to_string(), pos);
        self.graph.push(Value::Object(entity));
        Ok(&self.graph[pos])
    }

    /// Number of entities in the graph
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Rebuild the JSON-LD document
    pub fn to_jsonld(&self) -> Value {
        json!({
            "@context": self.context,
            "@graph": self.graph
        })
    }
}

impl EntityProvider for Crate {
    fn root_id(&self) -> &str {
        &self.root_id
    }

    fn all(&self) -> &[Value] {
        &self.graph
    }

    fn get(&self, id: &str) -> Option<&Value> {
        self.index.get(id).map(|&pos| &self.graph[pos])
    }
}

impl TermResolver for Crate {
    fn resolve_term(&self, name: &str) -> String {
        self.resolver.resolve_term(name)
    }
}

/// Locate the root entity through the metadata descriptor's `about`,
/// falling back to "./"
fn find_root_id(graph: &[Value], index: &HashMap<String, usize>) -> Option<String> {
    let about = graph
        .iter()
        .filter(|e| extract_id(e).map(is_metadata_descriptor_id).unwrap_or(false))
        .find_map(|descriptor| descriptor.get("about").and_then(reference_id));

    match about {
        Some(id) if index.contains_key(id) => Some(id.to_string()),
        Some(id) => {
            tracing::warn!("Metadata descriptor is about '{}' which is not in the graph", id);
            index
                .contains_key(ROOT_ENTITY_ID)
                .then(|| ROOT_ENTITY_ID.to_string())
        }
        None => index
            .contains_key(ROOT_ENTITY_ID)
            .then(|| ROOT_ENTITY_ID.to_string()),
    }
}
