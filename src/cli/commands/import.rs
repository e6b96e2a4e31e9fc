//! Import command implementation
//!
//! Loads an XML record batch into a table using a mapping from
//! `[[import.tables]]`.

use crate::adapters::database::create_statement_sink;
use crate::config::ExporterConfig;
use crate::core::import::RecordImporter;
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// XML file holding the records
    #[arg(short, long)]
    pub file: PathBuf,

    /// Target table; must have a mapping in the configuration
    #[arg(short, long)]
    pub table: String,

    /// Print the SQL instead of executing it
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config: ExporterConfig) -> anyhow::Result<i32> {
        let Some(mapping) = config.import.table(&self.table) else {
            eprintln!("No import mapping configured for table '{}'", self.table);
            return Ok(2);
        };
        let importer = RecordImporter::new(mapping);

        let xml = match tokio::fs::read_to_string(&self.file).await {
            Ok(xml) => xml,
            Err(e) => {
                eprintln!("Failed to read {}: {e}", self.file.display());
                return Ok(1);
            }
        };

        if self.dry_run {
            tracing::info!(table = %self.table, "Dry run - statements are printed, not executed");
            return match importer.dry_run(&xml) {
                Ok((report, statements)) => {
                    for statement in &statements {
                        println!("{statement}");
                    }
                    println!(
                        "🔍 Dry run: {} records would be inserted into {}",
                        report.records, report.table
                    );
                    Ok(0)
                }
                Err(e) => {
                    log_error_with_context!(&e, "Import failed");
                    eprintln!("Import failed: {e}");
                    Ok(1)
                }
            };
        }

        let sink = match create_statement_sink(&config.database) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database client");
                eprintln!("Failed to initialize database client: {e}");
                return Ok(5);
            }
        };

        match importer.import(&xml, sink.as_ref()).await {
            Ok(report) => {
                println!(
                    "✅ Imported {} records into {} ({} rows affected)",
                    report.records, report.table, report.rows_affected
                );
                Ok(0)
            }
            Err(e) => {
                log_error_with_context!(&e, "Import failed");
                eprintln!("Import failed: {e}");
                Ok(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unmapped_table_is_a_configuration_error() {
        let args = ImportArgs {
            file: PathBuf::from("users.xml"),
            table: "Unknown".to_string(),
            dry_run: true,
        };

        let code = args.execute(ExporterConfig::default()).await.unwrap();
        assert_eq!(code, 2);
    }
}
