//! Database client factory
//!
//! Builds the trait objects the export and import pipelines consume.

use crate::adapters::database::traits::{QuerySource, StatementSink};
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

fn create_adapter(config: &DatabaseConfig) -> Result<PostgreSQLAdapter> {
    tracing::info!(database = %config.display_target(), "Creating PostgreSQL client");
    let client = PostgreSQLClient::new(config.clone())?;
    Ok(PostgreSQLAdapter::new(client))
}

/// Create the query source used by the catalog export
///
/// # Errors
///
/// Returns an error if the connection pool cannot be built.
pub fn create_query_source(config: &DatabaseConfig) -> Result<Arc<dyn QuerySource>> {
    Ok(Arc::new(create_adapter(config)?))
}

/// Create the statement sink used by the record import
///
/// # Errors
///
/// Returns an error if the connection pool cannot be built.
pub fn create_statement_sink(config: &DatabaseConfig) -> Result<Arc<dyn StatementSink>> {
    Ok(Arc::new(create_adapter(config)?))
}
