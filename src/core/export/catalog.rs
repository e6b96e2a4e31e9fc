//! Catalog exporter - produces `assets.json` and `metadata.json`
//!
//! Runs the asset query and the reference queries one after another against
//! a [`QuerySource`], shapes the rows into records and writes the two
//! documents below the output root.

use crate::adapters::database::traits::QuerySource;
use crate::config::{CatalogConfig, ExportConfig};
use crate::core::export::documents::{
    render, with_subcategories, MetadataBundle, ASSETS_FILE, METADATA_FILE,
};
use crate::core::export::summary::ExportSummary;
use crate::core::export::writer::DocumentWriter;
use crate::core::transform::map_rows;
use crate::domain::context::ResultExt;
use crate::domain::{Record, Result};
use std::sync::Arc;
use std::time::Instant;

/// Exports the course catalog and its reference data
pub struct CatalogExporter {
    source: Arc<dyn QuerySource>,
    catalog: CatalogConfig,
    writer: DocumentWriter,
    atomic_writes: bool,
}

impl CatalogExporter {
    /// Create an exporter reading from `source`
    pub fn new(
        source: Arc<dyn QuerySource>,
        catalog: CatalogConfig,
        export: &ExportConfig,
    ) -> Self {
        Self {
            source,
            catalog,
            writer: DocumentWriter::new(export.output_root.clone()),
            atomic_writes: export.atomic_writes,
        }
    }

    /// Run the export
    ///
    /// With atomic writes both documents are rendered before either file is
    /// touched. Without them `assets.json` is written before the reference
    /// queries run and stays in place if one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first query, mapping or write failure. Nothing is logged
    /// here; the caller reports the error.
    pub async fn extract(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tracing::info!(
            run_id = %summary.run_id,
            source = %self.source.describe(),
            atomic_writes = self.atomic_writes,
            "Starting catalog export"
        );

        let assets = self.query_records("assets", &self.catalog.assets_query).await?;
        let assets_doc = render(ASSETS_FILE, &assets, assets.len())?;

        if self.atomic_writes {
            let metadata = self.collect_metadata().await?;
            let metadata_doc = render(METADATA_FILE, &metadata, metadata.record_count())?;

            for document in self
                .writer
                .write_all_atomic(&[assets_doc, metadata_doc])
                .await?
            {
                summary.add_document(document);
            }
        } else {
            summary.add_document(self.writer.write_direct(&assets_doc).await?);

            let metadata = self.collect_metadata().await?;
            let metadata_doc = render(METADATA_FILE, &metadata, metadata.record_count())?;
            summary.add_document(self.writer.write_direct(&metadata_doc).await?);
        }

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn collect_metadata(&self) -> Result<MetadataBundle> {
        let technologies = self
            .query_records("Technologies", &self.catalog.technologies_query)
            .await?;
        let categories = self
            .query_records("Categories", &self.catalog.categories_query)
            .await?;
        let audiences = self
            .query_records("Audiences", &self.catalog.audiences_query)
            .await?;
        let levels = self
            .query_records("Levels", &self.catalog.levels_query)
            .await?;
        let status_tags = self
            .query_records("StatusTag", &self.catalog.status_tags_query)
            .await?;

        Ok(MetadataBundle {
            technologies,
            categories: with_subcategories(categories),
            audiences,
            sources: self.catalog.sources.clone(),
            levels,
            status_tags,
        })
    }

    async fn query_records(&self, label: &str, sql: &str) -> Result<Vec<Record>> {
        let result_set = self
            .source
            .fetch(sql)
            .await
            .with_context(|| format!("Query for {label} failed"))?;

        let records =
            map_rows(&result_set).with_context(|| format!("Rows for {label} are malformed"))?;

        tracing::debug!(query = label, records = records.len(), "Query mapped to records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExporterError, ResultSet};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Answers queries from a fixed table; unknown queries fail
    struct FixedSource {
        results: HashMap<String, ResultSet>,
    }

    #[async_trait]
    impl QuerySource for FixedSource {
        async fn fetch(&self, sql: &str) -> Result<ResultSet> {
            self.results
                .get(sql)
                .cloned()
                .ok_or_else(|| ExporterError::Database(format!("relation missing for {sql}")))
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn single(column: &str, value: Value) -> ResultSet {
        ResultSet::new(vec![column.to_string()], vec![vec![value]])
    }

    fn full_source(catalog: &CatalogConfig) -> FixedSource {
        let mut results = HashMap::new();
        results.insert(
            catalog.assets_query.clone(),
            ResultSet::new(
                vec!["Id".into(), "Title".into()],
                vec![vec![json!(1), json!("SQL 101")]],
            ),
        );
        results.insert(catalog.technologies_query.clone(), single("Name", json!("SQL")));
        results.insert(catalog.categories_query.clone(), single("Name", json!("IT")));
        results.insert(catalog.audiences_query.clone(), single("Name", json!("All")));
        results.insert(catalog.levels_query.clone(), single("Name", json!("Beginner")));
        results.insert(catalog.status_tags_query.clone(), ResultSet::empty(vec!["Name".into()]));
        FixedSource { results }
    }

    fn exporter(source: FixedSource, dir: &TempDir, atomic: bool) -> CatalogExporter {
        let export = ExportConfig {
            output_root: dir.path().to_path_buf(),
            atomic_writes: atomic,
        };
        CatalogExporter::new(Arc::new(source), CatalogConfig::default(), &export)
    }

    #[tokio::test]
    async fn test_extract_writes_both_documents() {
        let dir = TempDir::new().unwrap();
        let catalog = CatalogConfig::default();
        let summary = exporter(full_source(&catalog), &dir, true)
            .extract()
            .await
            .unwrap();

        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.document(ASSETS_FILE).unwrap().records, 1);

        let metadata: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(metadata["Categories"][0]["SubCategories"], json!([]));
        assert_eq!(metadata["Sources"], json!(["Litmos", "Wombat"]));
        assert_eq!(metadata["StatusTag"], json!([]));
    }

    #[tokio::test]
    async fn test_failing_reference_query_keeps_previous_files_when_atomic() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ASSETS_FILE), "previous").unwrap();

        let catalog = CatalogConfig::default();
        let mut source = full_source(&catalog);
        source.results.remove(&catalog.levels_query);

        let err = exporter(source, &dir, true).extract().await.unwrap_err();

        assert!(err.to_string().contains("Query for Levels failed"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(ASSETS_FILE)).unwrap(),
            "previous"
        );
        assert!(!dir.path().join(METADATA_FILE).exists());
    }

    #[tokio::test]
    async fn test_failing_reference_query_leaves_assets_when_best_effort() {
        let dir = TempDir::new().unwrap();
        let catalog = CatalogConfig::default();
        let mut source = full_source(&catalog);
        source.results.remove(&catalog.technologies_query);

        assert!(exporter(source, &dir, false).extract().await.is_err());

        let assets = std::fs::read_to_string(dir.path().join(ASSETS_FILE)).unwrap();
        assert!(assets.contains("SQL 101"));
        assert!(!dir.path().join(METADATA_FILE).exists());
    }

    #[tokio::test]
    async fn test_malformed_rows_are_fatal() {
        let dir = TempDir::new().unwrap();
        let catalog = CatalogConfig::default();
        let mut source = full_source(&catalog);
        source.results.insert(
            catalog.assets_query.clone(),
            ResultSet::new(vec!["Id".into(), "Title".into()], vec![vec![json!(1)]]),
        );

        let err = exporter(source, &dir, true).extract().await.unwrap_err();

        let chain = err.source_chain().unwrap();
        assert!(chain.contains("Row 0 has 1 values but the result set has 2 columns"));
        assert!(!dir.path().join(ASSETS_FILE).exists());
    }
}
