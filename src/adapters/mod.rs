//! External system integrations
//!
//! - [`database`] - Trait-based database abstraction ([`database::QuerySource`],
//!   [`database::StatementSink`]) and the factory that builds them
//! - [`postgresql`] - PostgreSQL implementation backed by a deadpool pool
//!
//! The export and import pipelines only see the traits, so tests substitute
//! in-memory doubles for the database.
//!
//! ```rust,no_run
//! use spo_exporter::adapters::database::create_query_source;
//! use spo_exporter::config::DatabaseConfig;
//!
//! # async fn example() -> spo_exporter::domain::Result<()> {
//! let source = create_query_source(&DatabaseConfig::default())?;
//! let technologies = source.fetch(r#"select * from "SPO_Technologies""#).await?;
//! println!("{} technologies", technologies.len());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
