//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for database operations so
//! the export and import pipelines can run against PostgreSQL or a test double.

pub mod factory;
pub mod traits;

pub use factory::{create_query_source, create_statement_sink};
pub use traits::{InsertBatchResult, QuerySource, StatementSink};
