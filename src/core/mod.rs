//! Core business logic
//!
//! # Modules
//!
//! - [`export`] - Catalog export to `assets.json` and `metadata.json`
//! - [`import`] - XML record batches into database tables
//! - [`transform`] - Row mapping, field extraction and insert statements
//!
//! # Example
//!
//! ```rust,no_run
//! use spo_exporter::adapters::database::create_query_source;
//! use spo_exporter::config::load_config_or_default;
//! use spo_exporter::core::export::CatalogExporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("spo-exporter.toml")?;
//! let source = create_query_source(&config.database)?;
//!
//! let exporter = CatalogExporter::new(source, config.catalog.clone(), &config.export);
//! let summary = exporter.extract().await?;
//!
//! println!("Run {} wrote {} documents", summary.run_id, summary.documents.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod import;
pub mod transform;
