//! CLI interface and argument parsing

pub mod commands;

use crate::config::{load_config, load_config_or_default, ExporterConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "spo-exporter.toml";

/// SPO Exporter - Litmos training catalog to SharePoint JSON
#[derive(Parser, Debug)]
#[command(name = "spo-exporter")]
#[command(version, about, long_about = None)]
#[command(author = "SPO Exporter Contributors")]
pub struct Cli {
    /// Path to configuration file [default: spo-exporter.toml, optional]
    #[arg(short, long, env = "SPO_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SPO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Path of the configuration file in effect
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }

    /// Load the configuration
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load_config(&self) -> Result<ExporterConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => load_config_or_default(DEFAULT_CONFIG_PATH),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP export trigger
    Serve(commands::serve::ServeArgs),

    /// Run the catalog export once
    Export(commands::export::ExportArgs),

    /// Import an XML record batch into a mapped table
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["spo-exporter", "serve"]);
        assert!(cli.config.is_none());
        assert_eq!(cli.config_path(), "spo-exporter.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["spo-exporter", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config_path(), "custom.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let cli = Cli::parse_from(["spo-exporter", "--config", "does-not-exist.toml", "export"]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["spo-exporter", "--log-level", "debug", "serve"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from([
            "spo-exporter",
            "import",
            "--file",
            "users.xml",
            "--table",
            "Litmos_Users",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.table, "Litmos_Users");
                assert!(args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["spo-exporter", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["spo-exporter", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
