//! RO-Crate Preview Library
//!
//! This library flattens an RO-Crate metadata graph (JSON-LD) into a
//! denormalized view model and renders it as an HTML preview.
//!
//! # Overview
//!
//! JSON-LD graphs use compact property names, embedded references and
//! values that may be scalars or arrays. Templates want something uniform,
//! so flattening:
//!
//! 1. Enumerates every entity and indexes it by @id and by @type
//! 2. Resolves every property name to its canonical identifier
//! 3. Classifies every value as a literal, a reference to another entity,
//!    or an external link
//! 4. Materializes reverse edges on the entities that are referenced
//!
//! # Usage
//!
//! ```ignore
//! use rocrate_preview::{crate_lite, load, load_layout, CrateSource, LayoutSource, Renderer};
//!
//! let krate = load(&CrateSource::detect("path/to/crate"))?;
//! let view = crate_lite(&krate)?;
//! let layout = load_layout(&LayoutSource::Bundled)?;
//! let html = Renderer::new()?.render(&view, &layout)?;
//! ```

pub mod context;
pub mod entity;
pub mod error;
pub mod expand;
pub mod flatten;
pub mod layout;
pub mod loader;
pub mod provider;
pub mod render;
pub mod view;
pub mod vocab;

use std::path::PathBuf;

// Re-export main types for convenience
pub use crate::context::{ContextResolver, IdentityResolver, TermResolver};
pub use crate::error::PreviewError;
pub use crate::expand::expand_property_value;
pub use crate::flatten::{crate_lite, flatten, initialize_prop};
pub use crate::layout::{load_layout, LayoutSource};
pub use crate::loader::{load, CrateSource};
pub use crate::provider::{Crate, EntityProvider};
pub use crate::render::{render_template_string, Renderer};
pub use crate::view::{to_json_string, EntityView, Expansion, PropertySlot, ValueRecord, ViewModel};

/// Options for producing a preview
#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    /// Where the layout comes from
    pub layout: LayoutSource,
    /// Template to use instead of the bundled one
    pub template: Option<PathBuf>,
}

/// Load, flatten and render a crate in one go
pub fn preview(source: &CrateSource, options: &PreviewOptions) -> Result<String, PreviewError> {
    let krate = load(source)?;
    let view = crate_lite(&krate)?;
    let layout = load_layout(&options.layout)?;
    let renderer = match &options.template {
        Some(path) => Renderer::from_template_file(path)?,
        None => Renderer::new()?,
    };
    renderer.render(&view, &layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ro-crate-metadata.json"),
            r#"{
                "@context": "https://w3id.org/ro/crate/1.1/context",
                "@graph": [
                    {"@id": "ro-crate-metadata.json", "@type": "CreativeWork", "about": {"@id": "./"}},
                    {"@id": "./", "@type": "Dataset", "name": "Directory crate", "hasPart": {"@id": "doc.txt"}},
                    {"@id": "doc.txt", "@type": "File", "name": "A document"}
                ]
            }"#,
        )
        .unwrap();

        let options = PreviewOptions {
            layout: LayoutSource::Bundled,
            template: None,
        };
        let html = preview(&CrateSource::Directory(dir.path().to_path_buf()), &options).unwrap();
        assert!(html.contains("Directory crate"));
        assert!(html.contains(r##"<a href="#doc.txt">A document</a>"##));
    }
}
