//! JSON documents produced by the catalog export

use crate::domain::{Record, Result};
use serde::Serialize;
use serde_json::Value;

/// File name of the course catalog document
pub const ASSETS_FILE: &str = "assets.json";

/// File name of the reference data document
pub const METADATA_FILE: &str = "metadata.json";

/// Reference data published next to the course catalog
///
/// Field order is the key order of the written object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetadataBundle {
    #[serde(rename = "Technologies")]
    pub technologies: Vec<Record>,

    #[serde(rename = "Categories")]
    pub categories: Vec<Record>,

    #[serde(rename = "Audiences")]
    pub audiences: Vec<Record>,

    #[serde(rename = "Sources")]
    pub sources: Vec<String>,

    #[serde(rename = "Levels")]
    pub levels: Vec<Record>,

    #[serde(rename = "StatusTag")]
    pub status_tags: Vec<Record>,
}

impl MetadataBundle {
    /// Number of records returned by the reference queries
    ///
    /// The static `Sources` list is not query output and is not counted.
    pub fn record_count(&self) -> usize {
        self.technologies.len()
            + self.categories.len()
            + self.audiences.len()
            + self.levels.len()
            + self.status_tags.len()
    }
}

/// Give every category an empty `SubCategories` list
///
/// An existing `SubCategories` column is replaced in place.
pub fn with_subcategories(categories: Vec<Record>) -> Vec<Record> {
    categories
        .into_iter()
        .map(|mut category| {
            category.insert("SubCategories".to_string(), Value::Array(Vec::new()));
            category
        })
        .collect()
}

/// A document serialized and ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// File name relative to the output root
    pub name: &'static str,

    /// Number of records the document carries
    pub records: usize,

    /// Pretty-printed JSON with 2-space indentation
    pub bytes: Vec<u8>,
}

/// Serialize a document as pretty JSON
pub fn render<T: Serialize>(
    name: &'static str,
    value: &T,
    records: usize,
) -> Result<RenderedDocument> {
    let bytes = serde_json::to_vec_pretty(value)?;
    Ok(RenderedDocument {
        name,
        records,
        bytes,
    })
}
