//! Serve command implementation
//!
//! Runs the HTTP trigger until the process is asked to stop.

use crate::adapters::database::create_query_source;
use crate::api::{start_server, AppState};
use crate::config::ExporterConfig;
use crate::logging::create_alerter;
use clap::Args;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the bind address
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, mut config: ExporterConfig) -> anyhow::Result<i32> {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }

        let source = match create_query_source(&config.database) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database client");
                eprintln!("Failed to initialize database client: {e}");
                return Ok(5);
            }
        };

        let alerter = create_alerter(&config.alerting);
        if alerter.is_some() {
            tracing::info!(
                smtp = %config.alerting.smtp_server_name,
                recipients = config.alerting.to.len(),
                "Failure alerts enabled"
            );
        }

        let state = AppState::new(source, &config, alerter);
        start_server(&config.server, state).await?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args_defaults() {
        let args = ServeArgs {
            port: None,
            bind: None,
        };
        assert!(args.port.is_none());
        assert!(args.bind.is_none());
    }
}
