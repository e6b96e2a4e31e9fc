//! Configuration schema types
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) is a valid configuration that matches the legacy deployment.

use crate::config::SecretString;
use crate::core::transform::ColumnSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Database connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Output settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Catalog queries
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP trigger
    #[serde(default)]
    pub server: ServerConfig,

    /// Failure e-mail alerts
    #[serde(default)]
    pub alerting: AlertingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// XML import mappings
    #[serde(default)]
    pub import: ImportConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.database.validate()?;
        self.export.validate()?;
        self.catalog.validate()?;
        self.server.validate()?;
        self.alerting.validate()?;
        self.logging.validate()?;
        self.import.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database server host name
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login user
    #[serde(default = "default_username")]
    pub username: String,

    /// Login password
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// TLS mode: disable, prefer or require
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,

    /// Statement timeout in seconds
    #[serde(default = "default_statement_timeout_seconds")]
    pub statement_timeout_seconds: u64,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.server_name.is_empty() {
            return Err("database.server_name cannot be empty".to_string());
        }

        if self.database_name.is_empty() {
            return Err("database.database_name cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("database.port must be > 0".to_string());
        }

        if self.username.is_empty() {
            return Err("database.username cannot be empty".to_string());
        }

        let valid_ssl_modes = ["disable", "prefer", "require"];
        if !valid_ssl_modes.contains(&self.ssl_mode.as_str()) {
            return Err(format!(
                "database.ssl_mode must be one of: {}, got '{}'",
                valid_ssl_modes.join(", "),
                self.ssl_mode
            ));
        }

        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(format!(
                "database.max_connections must be between 1 and 100, got {}",
                self.max_connections
            ));
        }

        if self.statement_timeout_seconds == 0 {
            return Err("database.statement_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Connection target without credentials, for logs
    pub fn display_target(&self) -> String {
        format!(
            "postgresql://{}:{}/{}",
            self.server_name, self.port, self.database_name
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            database_name: default_database_name(),
            port: default_port(),
            username: default_username(),
            password: None,
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
            connection_timeout_seconds: default_connection_timeout_seconds(),
            statement_timeout_seconds: default_statement_timeout_seconds(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `assets.json` and `metadata.json`
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Render every document before writing and replace files by rename
    ///
    /// When disabled, `assets.json` is written before the metadata queries
    /// run and is kept if they fail.
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_root.as_os_str().is_empty() {
            return Err("export.output_root cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            atomic_writes: true,
        }
    }
}

/// Queries producing the catalog documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Course asset catalog
    #[serde(default = "default_assets_query")]
    pub assets_query: String,

    /// `Technologies` reference list
    #[serde(default = "default_technologies_query")]
    pub technologies_query: String,

    /// `Categories` reference list
    #[serde(default = "default_categories_query")]
    pub categories_query: String,

    /// `Audiences` reference list
    #[serde(default = "default_audiences_query")]
    pub audiences_query: String,

    /// `Levels` reference list
    #[serde(default = "default_levels_query")]
    pub levels_query: String,

    /// `StatusTag` reference list
    #[serde(default = "default_status_tags_query")]
    pub status_tags_query: String,

    /// Static `Sources` list
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        let queries = [
            ("assets_query", &self.assets_query),
            ("technologies_query", &self.technologies_query),
            ("categories_query", &self.categories_query),
            ("audiences_query", &self.audiences_query),
            ("levels_query", &self.levels_query),
            ("status_tags_query", &self.status_tags_query),
        ];
        for (name, query) in queries {
            if query.trim().is_empty() {
                return Err(format!("catalog.{name} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            assets_query: default_assets_query(),
            technologies_query: default_technologies_query(),
            categories_query: default_categories_query(),
            audiences_query: default_audiences_query(),
            levels_query: default_levels_query(),
            status_tags_query: default_status_tags_query(),
            sources: default_sources(),
        }
    }
}

/// HTTP trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Listen port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Deployment prefix in front of the namespace, empty by default
    #[serde(default)]
    pub url_prefix: String,

    /// API namespace between the prefix and `/execute`
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.url_prefix.is_empty() && !self.url_prefix.starts_with('/') {
            return Err(format!(
                "server.url_prefix must be empty or start with '/', got '{}'",
                self.url_prefix
            ));
        }
        if self.namespace.contains('/') {
            return Err(format!(
                "server.namespace must be a single path segment, got '{}'",
                self.namespace
            ));
        }
        if self.bind_address.is_empty() {
            return Err("server.bind_address cannot be empty".to_string());
        }
        Ok(())
    }

    /// Route of the export trigger: `{url_prefix}/{namespace}/execute`
    pub fn execute_path(&self) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        if self.namespace.is_empty() {
            format!("{prefix}/execute")
        } else {
            format!("{prefix}/{}/execute", self.namespace)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_server_port(),
            url_prefix: String::new(),
            namespace: default_namespace(),
        }
    }
}

/// Failure alert e-mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Send an e-mail when a triggered export fails
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host
    #[serde(default = "default_smtp_server_name")]
    pub smtp_server_name: String,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Sender address
    #[serde(default = "default_alert_from")]
    pub from: String,

    /// Recipient addresses
    #[serde(default)]
    pub to: Vec<String>,

    /// Subject line
    #[serde(default = "default_alert_subject")]
    pub subject: String,
}

impl AlertingConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.smtp_server_name.is_empty() {
            return Err("alerting enabled but smtp_server_name is empty".to_string());
        }
        if self.to.is_empty() {
            return Err("alerting enabled but no recipients configured in alerting.to".to_string());
        }
        Ok(())
    }
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server_name: default_smtp_server_name(),
            smtp_port: default_smtp_port(),
            from: default_alert_from(),
            to: Vec::new(),
            subject: default_alert_subject(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// XML import mappings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// One mapping per target table
    #[serde(default)]
    pub tables: Vec<ImportTableConfig>,
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.table.as_str()) {
                return Err(format!("import table '{}' is mapped twice", table.table));
            }
            if table.record_element.is_empty() {
                return Err(format!(
                    "import table '{}' has an empty record_element",
                    table.table
                ));
            }
            if table.columns.is_empty() {
                return Err(format!("import table '{}' has no columns", table.table));
            }
        }
        Ok(())
    }

    /// Mapping for a table by name
    pub fn table(&self, name: &str) -> Option<&ImportTableConfig> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// Mapping of XML records to one table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTableConfig {
    /// Target table, optionally schema-qualified
    pub table: String,

    /// Element name of each record in the XML batch
    pub record_element: String,

    /// Column values in table column order
    pub columns: Vec<ColumnSpec>,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_server_name() -> String {
    "cmogreport.cmog.org".to_string()
}

fn default_database_name() -> String {
    "Training_Portal".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_username() -> String {
    "spo_exporter".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_max_connections() -> usize {
    4
}

fn default_connection_timeout_seconds() -> u64 {
    30
}

fn default_statement_timeout_seconds() -> u64 {
    300
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_assets_query() -> String {
    r#"select * from "REPORT_Extract_Courses_For_SharePoint"()"#.to_string()
}

fn default_technologies_query() -> String {
    r#"select * from "SPO_Technologies""#.to_string()
}

fn default_categories_query() -> String {
    r#"select * from "SPO_Categories""#.to_string()
}

fn default_audiences_query() -> String {
    r#"select * from "SPO_Audiences""#.to_string()
}

fn default_levels_query() -> String {
    r#"select * from "SPO_Levels""#.to_string()
}

fn default_status_tags_query() -> String {
    r#"select * from "SPO_StatusTags""#.to_string()
}

fn default_sources() -> Vec<String> {
    vec!["Litmos".to_string(), "Wombat".to_string()]
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_namespace() -> String {
    "api".to_string()
}

fn default_smtp_server_name() -> String {
    "smtp.cmog.org".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_alert_from() -> String {
    "noreply@cmog.org".to_string()
}

fn default_alert_subject() -> String {
    "[ERROR] Litmos-SPO Export".to_string()
}

fn default_local_path() -> String {
    "/var/log/spo-exporter".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
