//! XML record importer
//!
//! Each element named by the mapping's `record_element` becomes one row. The
//! mapping's columns are evaluated against that element with the document
//! root available to ancestor lookups.

use crate::adapters::database::traits::StatementSink;
use crate::config::ImportTableConfig;
use crate::core::transform::{FieldExtractor, InsertStatement};
use crate::domain::context::ResultExt;
use crate::domain::{Result, XmlDocument};
use serde::Serialize;

/// Outcome of one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Target table
    pub table: String,

    /// Records found in the XML input
    pub records: usize,

    /// Rows the database reported as inserted (zero on dry runs)
    pub rows_affected: u64,

    /// Whether the statements were only rendered
    pub dry_run: bool,
}

/// Turns XML batches into insert statements for one table
pub struct RecordImporter {
    table: String,
    record_element: String,
    extractors: Vec<FieldExtractor>,
}

impl RecordImporter {
    /// Create an importer from a table mapping
    pub fn new(mapping: &ImportTableConfig) -> Self {
        Self {
            table: mapping.table.clone(),
            record_element: mapping.record_element.clone(),
            extractors: mapping.columns.iter().map(|c| c.to_extractor()).collect(),
        }
    }

    /// Target table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Build one insert statement per record, in document order
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or any record lacks a field
    /// its mapping requires. No statements are returned in that case.
    pub fn build_statements(&self, xml: &str) -> Result<Vec<InsertStatement>> {
        let document = XmlDocument::parse(xml)?;
        let root = document.root();

        root.descendants_named(&self.record_element)
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let values = self
                    .extractors
                    .iter()
                    .map(|extractor| extractor.extract(record, root))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .with_context(|| {
                        format!("{} record {} is invalid", self.record_element, index + 1)
                    })?;
                Ok(InsertStatement::new(self.table.as_str(), values)?)
            })
            .collect()
    }

    /// Render the statements as literal SQL without touching the database
    pub fn render(&self, xml: &str) -> Result<Vec<String>> {
        Ok(self
            .build_statements(xml)?
            .iter()
            .map(InsertStatement::render_literal)
            .collect())
    }

    /// Render the statements and report what an import would insert
    pub fn dry_run(&self, xml: &str) -> Result<(ImportReport, Vec<String>)> {
        let rendered = self.render(xml)?;
        let report = ImportReport {
            table: self.table.clone(),
            records: rendered.len(),
            rows_affected: 0,
            dry_run: true,
        };
        Ok((report, rendered))
    }

    /// Insert every record inside one unit of work
    pub async fn import(&self, xml: &str, sink: &dyn StatementSink) -> Result<ImportReport> {
        let statements = self.build_statements(xml)?;
        tracing::info!(
            table = %self.table,
            records = statements.len(),
            "Importing records"
        );

        let result = sink.insert_all(&statements).await?;

        Ok(ImportReport {
            table: self.table.clone(),
            records: statements.len(),
            rows_affected: result.rows_affected,
            dry_run: false,
        })
    }
}
