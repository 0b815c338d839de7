//! HTML rendering of a flattened crate
//!
//! Templates are Handlebars with HTML escaping. They see two values:
//! `data` (the [`ViewModel`]) and `layout` (the layout document).

use handlebars::{handlebars_helper, Handlebars};
use regex::Regex;
use serde_json::{json, Value};
use std::path::Path;

use crate::error::PreviewError;
use crate::view::ViewModel;
use crate::vocab::SCHEMA_NS;

const PREVIEW_TEMPLATE: &str = include_str!("../assets/preview.hbs");
const VALUES_PARTIAL: &str = include_str!("../assets/values.hbs");
const TEMPLATE_NAME: &str = "preview";

/// Text form of a JSON value: strings unquoted, everything else as JSON
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

handlebars_helper!(display: |value: Json| text_of(value));

// Lookup that also accepts the short form of a schema.org key
handlebars_helper!(safe_get: |obj: Json, key: str| {
    let found = obj.as_object().and_then(|map| {
        map.get(key).or_else(|| {
            key.strip_prefix(SCHEMA_NS)
                .and_then(|short| map.get(short))
        })
    });
    found.cloned().unwrap_or_else(|| json!(""))
});

handlebars_helper!(replace_regex: |value: Json, pattern: str, replacement: str| {
    let text = text_of(value);
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(&text, replacement).into_owned(),
        Err(e) => {
            tracing::warn!("Invalid pattern '{}' in replace_regex: {}", pattern, e);
            text
        }
    }
});

handlebars_helper!(test_regex: |value: Json, pattern: str| {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(&text_of(value)),
        Err(e) => {
            tracing::warn!("Invalid pattern '{}' in test_regex: {}", pattern, e);
            false
        }
    }
});

// Pair out of a value: the first two elements of an array, padded with `fallback`
handlebars_helper!(safe_unpack: |value: Json, {fallback: str = ""}| {
    match value.as_array().map(Vec::as_slice) {
        Some([first, second, ..]) => json!([first, second]),
        Some([first]) => json!([first, fallback]),
        _ => json!([value, fallback]),
    }
});

// Copy of an object with `key` set to true; other values come back unchanged
handlebars_helper!(set_prop: |obj: Json, key: str| {
    let mut obj = obj.clone();
    if let Some(map) = obj.as_object_mut() {
        map.insert(key.to_string(), Value::Bool(true));
    }
    obj
});

/// Handlebars registry with the preview helpers installed
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Renderer using the bundled preview template
    pub fn new() -> Result<Self, PreviewError> {
        Self::with_template(PREVIEW_TEMPLATE)
    }

    /// Renderer using the given template text
    pub fn with_template(template: &str) -> Result<Self, PreviewError> {
        let mut registry = Handlebars::new();
        registry.register_helper("display", Box::new(display));
        registry.register_helper("safe_get", Box::new(safe_get));
        registry.register_helper("replace_regex", Box::new(replace_regex));
        registry.register_helper("test_regex", Box::new(test_regex));
        registry.register_helper("safe_unpack", Box::new(safe_unpack));
        registry.register_helper("setProp", Box::new(set_prop));
        registry
            .register_partial("values", VALUES_PARTIAL)
            .map_err(|e| PreviewError::Render(e.to_string()))?;
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| PreviewError::Render(e.to_string()))?;
        Ok(Self { registry })
    }

    /// Renderer using a template file
    pub fn from_template_file(path: &Path) -> Result<Self, PreviewError> {
        if !path.exists() {
            return Err(PreviewError::InvalidPath(path.to_path_buf()));
        }
        let template = std::fs::read_to_string(path)?;
        Self::with_template(&template)
    }

    /// Render a view model with a layout
    pub fn render(&self, data: &ViewModel, layout: &Value) -> Result<String, PreviewError> {
        let context = json!({
            "data": data,
            "layout": layout,
        });
        tracing::info!(entities = data.ids.len(), "Rendering preview");
        self.registry
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| PreviewError::Render(e.to_string()))
    }
}

/// One-off render of a template string
pub fn render_template_string(
    data: &ViewModel,
    template: &str,
    layout: &Value,
) -> Result<String, PreviewError> {
    Renderer::with_template(template)?.render(data, layout)
}
