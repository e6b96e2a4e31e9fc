// SPO Exporter - Litmos training catalog to SharePoint ETL Tool
// Copyright (c) 2025 SPO Exporter Contributors
// Licensed under the MIT License

use clap::Parser;
use spo_exporter::cli::{Cli, Commands};
use spo_exporter::config::{ExporterConfig, LoggingConfig};
use spo_exporter::domain::Result;
use spo_exporter::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Configuration problems are reported by the command; logging still
    // starts with defaults so the report is visible.
    let loaded = cli.load_config();
    let logging_config = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "SPO Exporter - Litmos training catalog to SharePoint"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, loaded: Result<ExporterConfig>) -> anyhow::Result<i32> {
    if let Commands::ValidateConfig(args) = &cli.command {
        return args.execute(cli.config_path(), loaded).await;
    }
    if let Commands::Init(args) = &cli.command {
        return args.execute().await;
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Invalid configuration: {e}");
            return Ok(2);
        }
    };

    match &cli.command {
        Commands::Serve(args) => args.execute(config).await,
        Commands::Export(args) => args.execute(config).await,
        Commands::Import(args) => args.execute(config).await,
        Commands::ValidateConfig(_) | Commands::Init(_) => Ok(0),
    }
}
