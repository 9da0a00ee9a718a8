use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("failed to read ontology file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unparseable ontology file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One ontology entry: a canonical ingredient and the literal strings that
/// refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OntologyEntry {
    pub slug: String,
    pub display_name: String,
    #[serde(default)]
    pub surface_forms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdc_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_tokens: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_count: Option<u64>,
}

/// Load an ontology JSON file (an array of entries).
pub fn load_ontology(path: &Path) -> Result<Vec<OntologyEntry>, OntologyError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write entries back, sorted by slug for stable diffs.
pub fn save_ontology(path: &Path, entries: &[OntologyEntry]) -> Result<(), OntologyError> {
    let mut sorted: Vec<&OntologyEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.slug.cmp(&b.slug));
    fs::write(path, serde_json::to_string_pretty(&sorted)?)?;
    Ok(())
}
