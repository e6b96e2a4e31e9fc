//! Catalog export
//!
//! - [`catalog`] - Runs the queries and assembles the documents
//! - [`documents`] - Document shapes and JSON rendering
//! - [`writer`] - Atomic and best-effort file replacement
//! - [`summary`] - Per-run summary returned to the trigger

pub mod catalog;
pub mod documents;
pub mod summary;
pub mod writer;

pub use catalog::CatalogExporter;
pub use documents::{MetadataBundle, RenderedDocument, ASSETS_FILE, METADATA_FILE};
pub use summary::{ExportSummary, WrittenDocument};
pub use writer::DocumentWriter;
