//! Validate config command implementation

use crate::config::ExporterConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so this reports the outcome and prints
    /// the effective settings.
    pub async fn execute(
        &self,
        config_path: &str,
        loaded: Result<ExporterConfig>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration: {config_path}");
        println!();

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Database: {}", config.database.display_target());
        println!("  Database User: {}", config.database.username);
        println!(
            "  Database Password: {}",
            if config.database.password.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  SSL Mode: {}", config.database.ssl_mode);
        println!("  Output Root: {}", config.export.output_root.display());
        println!("  Atomic Writes: {}", config.export.atomic_writes);
        println!(
            "  Trigger: http://{}:{}{}",
            config.server.bind_address,
            config.server.port,
            config.server.execute_path()
        );
        println!(
            "  Alerting: {}",
            if config.alerting.enabled {
                format!(
                    "{} -> {}",
                    config.alerting.smtp_server_name,
                    config.alerting.to.join(", ")
                )
            } else {
                "disabled".to_string()
            }
        );
        println!("  Sources: {:?}", config.catalog.sources);
        println!(
            "  Import Tables: {}",
            if config.import.tables.is_empty() {
                "none".to_string()
            } else {
                config
                    .import
                    .tables
                    .iter()
                    .map(|t| t.table.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExporterError;

    #[tokio::test]
    async fn test_valid_configuration_exits_zero() {
        let code = ValidateArgs {}
            .execute("spo-exporter.toml", Ok(ExporterConfig::default()))
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_configuration_exits_two() {
        let loaded = Err(ExporterError::Configuration("bad port".to_string()));
        let code = ValidateArgs {}
            .execute("spo-exporter.toml", loaded)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
