//! Term resolution against a crate's @context
//!
//! Maps (possibly compact) property names onto their canonical identifiers.
//! This is deliberately not a JSON-LD processor: it understands term
//! definitions, prefixes and `@vocab`, which is all the RO-Crate context
//! uses for property names.

use serde_json::Value;
use std::collections::HashMap;

use crate::vocab::{is_rocrate_context, ID_KEY, ROCRATE_EXTRA_TERMS, SCHEMA_NS};

/// Resolve a property name to its canonical identifier
///
/// Implementations must be total: a name without a known mapping is
/// returned unchanged.
pub trait TermResolver {
    fn resolve_term(&self, name: &str) -> String;
}

/// A resolver that never expands anything
pub struct IdentityResolver;

impl TermResolver for IdentityResolver {
    fn resolve_term(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Resolver built from the term definitions of a JSON-LD @context
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    terms: HashMap<String, String>,
    vocab: Option<String>,
}

impl ContextResolver {
    /// Build a resolver from a document's @context value
    ///
    /// Accepts a string, an object, or an array of both. Entries are applied
    /// in order so later definitions override earlier ones.
    pub fn from_context(context: &Value) -> Self {
        let mut resolver = Self::default();
        resolver.apply(context);
        resolver
    }

    /// Resolver with just the built-in RO-Crate term table
    pub fn rocrate() -> Self {
        let mut resolver = Self::default();
        resolver.install_rocrate_terms();
        resolver
    }

    fn apply(&mut self, context: &Value) {
        match context {
            Value::String(url) if is_rocrate_context(url) => self.install_rocrate_terms(),
            Value::String(url) => {
                tracing::debug!("Not fetching remote context '{}'", url);
            }
            Value::Array(entries) => {
                for entry in entries {
                    self.apply(entry);
                }
            }
            Value::Object(definitions) => {
                for (term, definition) in definitions {
                    if term == "@vocab" {
                        self.vocab = definition.as_str().map(String::from);
                        continue;
                    }
                    let iri = match definition {
                        Value::String(iri) => Some(iri.as_str()),
                        Value::Object(obj) => obj.get(ID_KEY).and_then(|v| v.as_str()),
                        _ => None,
                    };
                    if let Some(iri) = iri {
                        self.terms.insert(term.clone(), iri.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    fn install_rocrate_terms(&mut self) {
        self.vocab = Some(SCHEMA_NS.to_string());
        for (term, iri) in ROCRATE_EXTRA_TERMS {
            self.terms.insert(term.to_string(), iri.to_string());
        }
    }

    /// Expand `prefix:suffix` when the prefix is a defined term
    fn expand_prefixed(&self, name: &str) -> Option<String> {
        let (prefix, suffix) = name.split_once(':')?;
        if suffix.starts_with("//") {
            // Already an absolute IRI such as http://...
            return None;
        }
        self.terms
            .get(prefix)
            .map(|base| format!("{}{}", base, suffix))
    }
}

impl TermResolver for ContextResolver {
    fn resolve_term(&self, name: &str) -> String {
        if name.starts_with('@') {
            return name.to_string();
        }
        if let Some(iri) = self.terms.get(name) {
            return self.expand_prefixed(iri).unwrap_or_else(|| iri.clone());
        }
        if name.contains(':') {
            return self
                .expand_prefixed(name)
                .unwrap_or_else(|| name.to_string());
        }
        match &self.vocab {
            Some(vocab) => format!("{}{}", vocab, name),
            None => name.to_string(),
        }
    }
}
