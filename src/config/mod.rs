//! Configuration management
//!
//! The exporter is configured once at startup into an [`ExporterConfig`] that
//! is passed by reference to every component; nothing reads the environment
//! after loading.
//!
//! # Sources
//!
//! 1. Built-in defaults matching the production deployment
//! 2. An optional TOML file (`spo-exporter.toml`) with `${VAR}` substitution
//! 3. Environment overrides (`DATABASE_NAME`, `SERVER_NAME`,
//!    `SMTP_SERVER_NAME`, `OUTPUT_ROOT`, `API_URL_PREFIX`, `SPO_*`)
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! server_name = "cmogreport.cmog.org"
//! database_name = "Training_Portal"
//! username = "spo_exporter"
//! password = "${SPO_DATABASE_PASSWORD}"
//!
//! [export]
//! output_root = "/srv/sharepoint/training"
//!
//! [server]
//! url_prefix = "/litmos"
//!
//! [alerting]
//! enabled = true
//! to = ["training-admins@cmog.org"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    AlertingConfig, ApplicationConfig, CatalogConfig, DatabaseConfig, ExportConfig,
    ExporterConfig, ImportConfig, ImportTableConfig, LoggingConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
