//! Export command implementation
//!
//! Runs the catalog export once, outside the HTTP trigger.

use crate::adapters::database::create_query_source;
use crate::config::ExporterConfig;
use crate::core::export::CatalogExporter;
use crate::{log_error_with_context, log_export_complete, log_export_start};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Override the output directory
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// Write each document as soon as it is ready instead of replacing both at the end
    #[arg(long)]
    pub best_effort: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, mut config: ExporterConfig) -> anyhow::Result<i32> {
        if let Some(output_root) = &self.output_root {
            tracing::info!(output_root = %output_root.display(), "Overriding output root from CLI");
            config.export.output_root = output_root.clone();
        }
        if self.best_effort {
            config.export.atomic_writes = false;
        }

        let source = match create_query_source(&config.database) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database client");
                eprintln!("Failed to initialize database client: {e}");
                return Ok(5);
            }
        };

        log_export_start!("cli", config.export.output_root.display());
        let exporter = CatalogExporter::new(source, config.catalog.clone(), &config.export);

        let summary = match exporter.extract().await {
            Ok(summary) => summary,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                if let Some(traceback) = e.source_chain() {
                    eprintln!("  caused by: {traceback}");
                }
                return Ok(1);
            }
        };

        log_export_complete!(&summary);

        println!();
        println!("📊 Export Summary:");
        println!("  Run: {}", summary.run_id);
        for document in &summary.documents {
            println!(
                "  {}: {} records, {} bytes",
                document.path.display(),
                document.records,
                document.bytes
            );
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("✅ Export completed successfully!");

        Ok(0)
    }
}
