//! PostgreSQL adapter implementing the database traits

use crate::adapters::database::traits::{InsertBatchResult, QuerySource, StatementSink};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::core::transform::InsertStatement;
use crate::domain::{Result, ResultSet};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`QuerySource`] and [`StatementSink`]
#[derive(Clone)]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl QuerySource for PostgreSQLAdapter {
    async fn fetch(&self, sql: &str) -> Result<ResultSet> {
        tracing::debug!(sql, "Running query");
        let result_set = self.client.fetch_result_set(sql).await?;
        tracing::debug!(
            rows = result_set.len(),
            columns = result_set.columns.len(),
            "Query returned"
        );
        Ok(result_set)
    }

    fn describe(&self) -> String {
        self.client.display_target()
    }
}

#[async_trait]
impl StatementSink for PostgreSQLAdapter {
    async fn insert_all(&self, statements: &[InsertStatement]) -> Result<InsertBatchResult> {
        if statements.is_empty() {
            return Ok(InsertBatchResult::default());
        }

        let rows_affected = self.client.insert_all(statements).await?;
        Ok(InsertBatchResult {
            statements: statements.len(),
            rows_affected,
        })
    }
}
