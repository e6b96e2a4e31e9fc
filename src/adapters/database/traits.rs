//! Database abstraction traits
//!
//! This module defines the capabilities the exporter needs from a database.
//! The catalog export only reads; the record import only inserts.

use crate::core::transform::InsertStatement;
use crate::domain::record::ResultSet;
use crate::domain::Result;
use async_trait::async_trait;

/// Result of an insert batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertBatchResult {
    /// Number of statements executed
    pub statements: usize,

    /// Rows reported as affected by the database
    pub rows_affected: u64,
}

/// Source of tabular query results
///
/// Implementations run one query and return its rows together with the
/// column names, including when the query returns no rows.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Run a query and collect the full result set
    ///
    /// # Arguments
    ///
    /// * `sql` - Query text; no parameters are bound
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the query fails, or a column has
    /// a type the adapter cannot represent.
    async fn fetch(&self, sql: &str) -> Result<ResultSet>;

    /// Short description of the source for logs (never contains credentials)
    fn describe(&self) -> String;
}

/// Sink for parameterized insert statements
#[async_trait]
pub trait StatementSink: Send + Sync {
    /// Execute all statements as one unit of work
    ///
    /// Either every statement is applied or none is.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; earlier statements of the
    /// batch are rolled back.
    async fn insert_all(&self, statements: &[InsertStatement]) -> Result<InsertBatchResult>;
}
