//! Import of XML record batches into database tables

pub mod importer;

pub use importer::{ImportReport, RecordImporter};
