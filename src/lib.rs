// SPO Exporter - Litmos training catalog to SharePoint ETL Tool
// Copyright (c) 2025 SPO Exporter Contributors
// Licensed under the MIT License

//! # SPO Exporter - Litmos training catalog to SharePoint
//!
//! Publishes the training portal's course catalog as two JSON documents that
//! a SharePoint site reads: `assets.json` (one entry per course) and
//! `metadata.json` (the reference lists used for filtering). An HTTP trigger
//! runs the export on demand.
//!
//! ## Overview
//!
//! - **Extracting** the catalog and reference lists from PostgreSQL
//! - **Shaping** rows into column-keyed records
//! - **Writing** both documents, atomically by default
//! - **Importing** XML record batches into tables through declarative field
//!   mappings
//!
//! ## Architecture
//!
//! - [`api`] - HTTP trigger (axum)
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export, import and data shaping
//! - [`adapters`] - Database traits and the PostgreSQL implementation
//! - [`domain`] - Error types, result sets and XML trees
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and failure alerts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spo_exporter::adapters::database::create_query_source;
//! use spo_exporter::config::load_config_or_default;
//! use spo_exporter::core::export::CatalogExporter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("spo-exporter.toml")?;
//!     let source = create_query_source(&config.database)?;
//!
//!     let exporter = CatalogExporter::new(source, config.catalog.clone(), &config.export);
//!     let summary = exporter.extract().await?;
//!
//!     println!("Exported {} records", summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Field Extractors
//!
//! XML records are mapped to column values with small composable extractors:
//!
//! ```rust
//! use spo_exporter::core::transform::FieldExtractor;
//! use spo_exporter::domain::XmlDocument;
//!
//! let doc = XmlDocument::parse("<Users><User><Email>jane.doe@cmog.org</Email></User></Users>").unwrap();
//! let root = doc.root();
//! let user = root.find("User").unwrap();
//!
//! let username = FieldExtractor::username_from_email("Email");
//! assert_eq!(username.literal(user, root).unwrap(), "'jane.doe'");
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::ExporterError`] and never logs failures
//! itself; the HTTP trigger and the CLI report each failure once.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
