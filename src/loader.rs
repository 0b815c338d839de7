//! Loading RO-Crate metadata from directories, files, zip archives and URLs
//!
//! Every source ends up as the text of one metadata document, which is
//! parsed into a [`Crate`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::PreviewError;
use crate::provider::Crate;
use crate::vocab::METADATA_DESCRIPTOR_ID;

/// Source from which to load an RO-Crate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrateSource {
    /// Local directory containing ro-crate-metadata.json
    Directory(PathBuf),
    /// A metadata file given directly
    MetadataFile(PathBuf),
    /// Local zip file holding a crate
    Zip(PathBuf),
    /// Remote URL (may or may not end with ro-crate-metadata.json)
    Url(String),
}

impl CrateSource {
    /// Work out what kind of source a command-line argument names
    pub fn detect(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            return CrateSource::Url(source.to_string());
        }
        let path = PathBuf::from(source);
        if path.is_dir() {
            CrateSource::Directory(path)
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
        {
            CrateSource::Zip(path)
        } else {
            CrateSource::MetadataFile(path)
        }
    }

    /// Directory a preview for this crate is written to, for local sources
    pub fn preview_dir(&self) -> Option<PathBuf> {
        match self {
            CrateSource::Directory(p) => Some(p.clone()),
            CrateSource::MetadataFile(p) | CrateSource::Zip(p) => {
                Some(p.parent().map(Path::to_path_buf).unwrap_or_default())
            }
            CrateSource::Url(_) => None,
        }
    }
}

/// Load a crate from any source
pub fn load(source: &CrateSource) -> Result<Crate, PreviewError> {
    let (label, content) = match source {
        CrateSource::Directory(p) => {
            let metadata_path = find_metadata_in_directory(p)?;
            let content = read_file(&metadata_path)?;
            (metadata_path.display().to_string(), content)
        }
        CrateSource::MetadataFile(p) => (p.display().to_string(), read_file(p)?),
        CrateSource::Zip(p) => (p.display().to_string(), load_from_zip(p)?),
        CrateSource::Url(u) => fetch_metadata_from_url(u)?,
    };

    tracing::info!("Loading crate metadata from {}", label);
    Crate::from_json_str(&content, &label)
}

fn read_file(path: &Path) -> Result<String, PreviewError> {
    if !path.exists() {
        return Err(PreviewError::InvalidPath(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| PreviewError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Find ro-crate-metadata.json (with optional prefix) in a directory
pub fn find_metadata_in_directory(path: &Path) -> Result<PathBuf, PreviewError> {
    if !path.is_dir() {
        return Err(PreviewError::InvalidPath(path.to_path_buf()));
    }

    let standard = path.join(METADATA_DESCRIPTOR_ID);
    if standard.exists() {
        return Ok(standard);
    }

    // Look for *-ro-crate-metadata.json, taking the first by name
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(path)?
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with("-ro-crate-metadata.json"))
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();
    if candidates.len() > 1 {
        tracing::warn!(
            "Found {} prefixed metadata files in {}, using {}",
            candidates.len(),
            path.display(),
            candidates[0].display()
        );
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| PreviewError::LoadError {
            path: path.display().to_string(),
            reason: "No ro-crate-metadata.json found".to_string(),
        })
}

/// Read the root ro-crate-metadata.json out of a zip file
pub fn load_from_zip(path: &Path) -> Result<String, PreviewError> {
    if !path.exists() {
        return Err(PreviewError::InvalidPath(path.to_path_buf()));
    }

    let zip_error = |reason: String| PreviewError::LoadError {
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| zip_error(format!("Failed to open zip file: {}", e)))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| zip_error(format!("Failed to read zip archive: {}", e)))?;

    let entries: Vec<String> = archive.file_names().map(String::from).collect();
    let metadata_name = find_root_metadata(&entries).ok_or_else(|| {
        zip_error("No root ro-crate-metadata.json found at archive root".to_string())
    })?;

    let mut metadata_file = archive
        .by_name(&metadata_name)
        .map_err(|e| zip_error(format!("Failed to extract {}: {}", metadata_name, e)))?;
    let mut content = String::new();
    metadata_file
        .read_to_string(&mut content)
        .map_err(|e| zip_error(format!("Failed to read metadata file: {}", e)))?;

    Ok(content)
}

/// Pick the root metadata entry among a zip's entry names
///
/// The metadata must sit at the archive root, or directly inside the single
/// top-level folder the crate was zipped as.
fn find_root_metadata(entries: &[String]) -> Option<String> {
    let is_metadata = |name: &str| name.ends_with(METADATA_DESCRIPTOR_ID);

    if let Some(entry) = entries
        .iter()
        .find(|e| !e.contains('/') && is_metadata(e.as_str()))
    {
        return Some(entry.clone());
    }

    let mut top_level = entries
        .iter()
        .filter_map(|e| e.split('/').next())
        .filter(|s| !s.is_empty());
    let prefix = top_level.next()?;
    if top_level.any(|other| other != prefix) {
        return None;
    }

    let expected_root = format!("{}/", prefix);
    entries
        .iter()
        .find(|entry| {
            entry
                .strip_prefix(&expected_root)
                .is_some_and(|rest| !rest.contains('/') && is_metadata(rest))
        })
        .cloned()
}

/// Fetch metadata from URL, trying /ro-crate-metadata.json if URL doesn't point to metadata
///
/// Returns the URL the metadata was found at together with its content.
fn fetch_metadata_from_url(url: &str) -> Result<(String, String), PreviewError> {
    if url.ends_with(METADATA_DESCRIPTOR_ID) {
        let content = fetch_url(url)?;
        return Ok((url.to_string(), content));
    }

    let metadata_url = format!("{}/{}", url.trim_end_matches('/'), METADATA_DESCRIPTOR_ID);
    match fetch_url(&metadata_url) {
        Ok(content) if looks_like_json_object(&content) => return Ok((metadata_url, content)),
        Ok(_) => tracing::debug!("{} did not return JSON", metadata_url),
        Err(e) => tracing::debug!("{}", e),
    }

    // Fall back to fetching URL directly (maybe it IS the metadata)
    let content = fetch_url(url)?;
    if looks_like_json_object(&content) {
        Ok((url.to_string(), content))
    } else {
        Err(PreviewError::LoadError {
            path: url.to_string(),
            reason: "URL does not contain valid RO-Crate metadata".to_string(),
        })
    }
}

fn looks_like_json_object(content: &str) -> bool {
    content.trim_start().starts_with('{')
}

/// Simple blocking GET that fails on HTTP error statuses
pub(crate) fn fetch_url(url: &str) -> Result<String, PreviewError> {
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|e| PreviewError::LoadError {
            path: url.to_string(),
            reason: format!("HTTP request failed: {}", e),
        })?
        .text()
        .map_err(|e| PreviewError::LoadError {
            path: url.to_string(),
            reason: format!("Failed to read response: {}", e),
        })
}
