//! PostgreSQL client implementation
//!
//! Wraps a deadpool connection pool. Every operation checks a connection out
//! for its own duration only, so a failure never leaks a connection.

use super::values::{bind_params, row_to_values};
use crate::config::schema::DatabaseConfig;
use crate::core::transform::InsertStatement;
use crate::domain::{ExporterError, Result, ResultSet};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::types::ToSql;

/// PostgreSQL client backed by a connection pool
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: DatabaseConfig,
}

fn ssl_mode(value: &str) -> Result<SslMode> {
    match value {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(ExporterError::Configuration(format!(
            "Unsupported ssl_mode '{other}'"
        ))),
    }
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS connector or the pool cannot be built.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.connection_timeout_seconds);

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.server_name)
            .port(config.port)
            .dbname(&config.database_name)
            .user(&config.username)
            .application_name("spo-exporter")
            .connect_timeout(timeout)
            .ssl_mode(ssl_mode(&config.ssl_mode)?);
        if let Some(password) = &config.password {
            pg_config.password(password.expose_secret().as_ref());
        }

        let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
            ExporterError::Configuration(format!("Failed to build TLS connector: {e}"))
        })?;
        let tls = MakeTlsConnector::new(connector);

        let manager = Manager::from_config(
            pg_config,
            tls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                ExporterError::Database(format!("Failed to create connection pool: {e}"))
            })?;

        Ok(Self { pool, config })
    }

    /// Get a connection from the pool with the statement timeout applied
    async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| {
            ExporterError::Database(format!(
                "Failed to connect to {}: {e}",
                self.config.display_target()
            ))
        })?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.batch_execute(&timeout_query).await.map_err(|e| {
            ExporterError::Database(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(client)
    }

    /// Run a query and collect its column names and rows
    ///
    /// Column names come from the prepared statement, so an empty result
    /// still carries its columns.
    pub async fn fetch_result_set(&self, sql: &str) -> Result<ResultSet> {
        let client = self.get_connection().await?;

        let statement = client
            .prepare(sql)
            .await
            .map_err(|e| ExporterError::Database(format!("Failed to prepare query: {e}")))?;

        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = client
            .query(&statement, &[])
            .await
            .map_err(|e| ExporterError::Database(format!("Query failed: {e}")))?;

        let rows = rows.iter().map(row_to_values).collect::<Result<Vec<_>>>()?;

        Ok(ResultSet::new(columns, rows))
    }

    /// Execute insert statements inside one transaction
    ///
    /// Returns the number of rows affected. Any failure rolls the whole batch
    /// back.
    pub async fn insert_all(&self, statements: &[InsertStatement]) -> Result<u64> {
        let mut client = self.get_connection().await?;
        let transaction = client
            .transaction()
            .await
            .map_err(|e| ExporterError::Database(format!("Failed to begin transaction: {e}")))?;

        let mut rows_affected = 0;
        for (index, statement) in statements.iter().enumerate() {
            let prepared = transaction.prepare(&statement.sql()).await.map_err(|e| {
                ExporterError::Database(format!(
                    "Failed to prepare insert {} into '{}': {e}",
                    index + 1,
                    statement.table()
                ))
            })?;

            let values: Vec<_> = statement.values().iter().map(|v| v.to_bind()).collect();
            let params = bind_params(&values, prepared.params())?;
            let refs: Vec<&(dyn ToSql + Sync)> = params
                .iter()
                .map(|p| &**p as &(dyn ToSql + Sync))
                .collect();

            rows_affected += transaction.execute(&prepared, &refs).await.map_err(|e| {
                ExporterError::Database(format!(
                    "Insert {} into '{}' failed: {e}",
                    index + 1,
                    statement.table()
                ))
            })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| ExporterError::Database(format!("Failed to commit transaction: {e}")))?;

        Ok(rows_affected)
    }

    /// Connection target without credentials
    pub fn display_target(&self) -> String {
        self.config.display_target()
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            server_name: "localhost".to_string(),
            database_name: "Training_Portal".to_string(),
            password: Some(secret_string("hunter2".to_string())),
            ssl_mode: "disable".to_string(),
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_ssl_mode_parsing() {
        assert!(matches!(ssl_mode("disable"), Ok(SslMode::Disable)));
        assert!(matches!(ssl_mode("require"), Ok(SslMode::Require)));
        assert!(ssl_mode("verify-full").is_err());
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let client = PostgreSQLClient::new(config()).unwrap();
        assert_eq!(client.pool_status().size, 0);
        assert!(!client.display_target().contains("hunter2"));
    }
}
