//! HTTP trigger for the catalog export
//!
//! # API Endpoints
//!
//! | Method | Path                               | Description                  |
//! |--------|------------------------------------|------------------------------|
//! | GET    | `/health`                          | Health check                 |
//! | GET    | `{url_prefix}/{namespace}/execute` | Run the export synchronously |

use super::types::{ErrorResponse, ExecuteResponse};
use crate::adapters::database::traits::QuerySource;
use crate::config::{CatalogConfig, ExportConfig, ExporterConfig, ServerConfig};
use crate::core::export::CatalogExporter;
use crate::domain::{ExporterError, Result};
use crate::logging::{Alerter, FailureAlert};
use crate::{log_error_with_context, log_export_complete, log_export_start};
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared state of the trigger
#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn QuerySource>,
    catalog: CatalogConfig,
    export: ExportConfig,
    alerter: Option<Arc<dyn Alerter>>,
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Build the state from the loaded configuration
    pub fn new(
        source: Arc<dyn QuerySource>,
        config: &ExporterConfig,
        alerter: Option<Arc<dyn Alerter>>,
    ) -> Self {
        Self {
            source,
            catalog: config.catalog.clone(),
            export: config.export.clone(),
            alerter,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the router
pub fn router(state: AppState, execute_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(execute_path, get(execute))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the trigger until Ctrl+C or SIGTERM
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let execute_path = config.execute_path();
    let app = router(state, &execute_path);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, execute = %execute_path, "SPO exporter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ExporterError::Server(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "spo-exporter",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Export trigger endpoint
///
/// Runs are serialized; a request arriving during a run waits for it.
pub async fn execute(
    State(state): State<AppState>,
) -> std::result::Result<Json<ExecuteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let _run = state.run_lock.lock().await;
    log_export_start!("http", state.export.output_root.display());

    let exporter = CatalogExporter::new(state.source.clone(), state.catalog.clone(), &state.export);

    match exporter.extract().await {
        Ok(summary) => {
            log_export_complete!(&summary);
            Ok(Json(ExecuteResponse::new(summary)))
        }
        Err(error) => {
            log_error_with_context!(&error, "Triggered export failed");

            if let Some(alerter) = &state.alerter {
                if let Err(alert_error) = alerter.send(&FailureAlert::from_error(&error)).await {
                    tracing::warn!(error = %alert_error, "Failure alert not delivered");
                }
            }

            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from_error(&error)),
            ))
        }
    }
}
