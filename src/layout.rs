//! Layout documents for the preview
//!
//! A layout groups property identifiers into named sections. It is passed
//! to the template as-is, so it stays an untyped JSON value here.

use serde_json::Value;
use std::path::PathBuf;

use crate::error::PreviewError;
use crate::loader::fetch_url;
use crate::vocab::DEFAULT_LAYOUT_URL;

/// Layout shipped with the crate, used offline and when a fetch fails
const BUNDLED_LAYOUT: &str = include_str!("../assets/default_layout.json");

/// Where to take the layout from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSource {
    Url(String),
    File(PathBuf),
    Bundled,
}

impl Default for LayoutSource {
    fn default() -> Self {
        LayoutSource::Url(DEFAULT_LAYOUT_URL.to_string())
    }
}

impl LayoutSource {
    /// Interpret a command-line argument as a URL or a file path
    pub fn detect(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            LayoutSource::Url(source.to_string())
        } else {
            LayoutSource::File(PathBuf::from(source))
        }
    }
}

/// The bundled default layout
///
/// A bundled layout that fails to parse is logged and replaced by null, which
/// templates treat as "no layout".
pub fn bundled_layout() -> Value {
    parse_layout(BUNDLED_LAYOUT, "bundled layout")
}

fn parse_layout(content: &str, label: &str) -> Value {
    match serde_json::from_str(content) {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!("Could not parse {} ({}), rendering without one", label, e);
            Value::Null
        }
    }
}

/// Load a layout; remote failures fall back to the bundled layout
pub fn load_layout(source: &LayoutSource) -> Result<Value, PreviewError> {
    match source {
        LayoutSource::Url(url) => {
            tracing::info!("Fetching layout from {}", url);
            match fetch_url(url).and_then(|body| Ok(serde_json::from_str::<Value>(&body)?)) {
                Ok(layout) => Ok(layout),
                Err(e) => {
                    tracing::warn!("Could not load layout from {} ({}), using bundled layout", url, e);
                    Ok(bundled_layout())
                }
            }
        }
        LayoutSource::File(path) => {
            if !path.exists() {
                return Err(PreviewError::InvalidPath(path.clone()));
            }
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        LayoutSource::Bundled => Ok(bundled_layout()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_layout_parses() {
        let layout = bundled_layout();
        let groups = layout.as_array().unwrap();
        assert!(!groups.is_empty());
        assert!(groups.iter().all(|g| g.get("inputs").is_some()));
    }

    #[test]
    fn test_unparseable_layout_is_null() {
        assert_eq!(parse_layout("[{\"name\": ", "broken layout"), Value::Null);
        assert_eq!(parse_layout("[]", "empty layout"), serde_json::json!([]));
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            LayoutSource::detect("https://example.org/layout.json"),
            LayoutSource::Url("https://example.org/layout.json".to_string())
        );
        assert_eq!(
            LayoutSource::detect("layout.json"),
            LayoutSource::File(PathBuf::from("layout.json"))
        );
    }

    #[test]
    fn test_load_layout_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"[{"name": "Only", "inputs": ["http://schema.org/name"]}]"#)
            .unwrap();

        let layout = load_layout(&LayoutSource::File(path)).unwrap();
        assert_eq!(layout[0]["name"], "Only");

        assert!(matches!(
            load_layout(&LayoutSource::File(dir.path().join("missing.json"))),
            Err(PreviewError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_unreachable_url_falls_back() {
        let layout = load_layout(&LayoutSource::Url("http://127.0.0.1:9/layout.json".to_string()))
            .unwrap();
        assert_eq!(layout, bundled_layout());
    }
}
