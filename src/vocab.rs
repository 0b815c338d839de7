//! Vocabulary definitions for RO-Crate previews
//!
//! JSON-LD keywords and the well-known identifiers of an RO-Crate graph.

/// Identifier key of a JSON-LD node
pub const ID_KEY: &str = "@id";

/// Type key of a JSON-LD node
pub const TYPE_KEY: &str = "@type";

/// Literal value key of a JSON-LD value object
pub const VALUE_KEY: &str = "@value";

/// Property holding an entity's display name
pub const NAME_KEY: &str = "name";

/// Standard metadata descriptor filename
pub const METADATA_DESCRIPTOR_ID: &str = "ro-crate-metadata.json";

/// Root entity ID
pub const ROOT_ENTITY_ID: &str = "./";

/// Prefix of every published RO-Crate context / profile URL
pub const ROCRATE_PROFILE_PREFIX: &str = "https://w3id.org/ro/crate/";

/// Context used when building a crate from scratch
pub const ROCRATE_CONTEXT_1_1: &str = "https://w3id.org/ro/crate/1.1/context";

/// Profile the metadata descriptor of a minimal crate conforms to
pub const ROCRATE_PROFILE_1_1: &str = "https://w3id.org/ro/crate/1.1";

/// Vocabulary the RO-Crate context maps bare terms into
pub const SCHEMA_NS: &str = "http://schema.org/";

/// File name of the rendered preview
pub const PREVIEW_FILENAME: &str = "ro-crate-preview.html";

/// Default layout published by crate-o
pub const DEFAULT_LAYOUT_URL: &str = "https://raw.githubusercontent.com/Language-Research-Technology/crate-o/refs/heads/main/src/lib/components/default_layout.json";

/// Terms of the RO-Crate context that do not live in schema.org
pub const ROCRATE_EXTRA_TERMS: &[(&str, &str)] = &[
    ("conformsTo", "http://purl.org/dc/terms/conformsTo"),
    ("Profile", "http://www.w3.org/ns/dx/prof/Profile"),
    ("File", "http://schema.org/MediaObject"),
    ("Journal", "http://schema.org/Periodical"),
    ("pcdm", "http://pcdm.org/models#"),
    ("hasMember", "http://pcdm.org/models#hasMember"),
    ("memberOf", "http://pcdm.org/models#memberOf"),
    ("hasFile", "http://pcdm.org/models#hasFile"),
    ("fileOf", "http://pcdm.org/models#fileOf"),
    ("RepositoryCollection", "http://pcdm.org/models#Collection"),
    ("RepositoryObject", "http://pcdm.org/models#Object"),
    ("RepositoryFile", "http://pcdm.org/models#File"),
    ("dct", "http://purl.org/dc/terms/"),
    ("bibo", "http://purl.org/ontology/bibo/"),
];

/// Check whether an @id names a metadata descriptor (including prefixed variants)
pub fn is_metadata_descriptor_id(id: &str) -> bool {
    id == METADATA_DESCRIPTOR_ID || id.ends_with("-ro-crate-metadata.json")
}

/// Check whether a context URL refers to a published RO-Crate context
pub fn is_rocrate_context(url: &str) -> bool {
    url.starts_with(ROCRATE_PROFILE_PREFIX) || url == "https://w3id.org/ro/crate"
}
