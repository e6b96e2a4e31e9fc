//! Logging and failure alerting
//!
//! - Structured logging with `tracing` (console, optional rotated JSON files)
//! - E-mail alerts for failed export runs ([`alert`])
//!
//! # Example
//!
//! ```no_run
//! use spo_exporter::logging::init_logging;
//! use spo_exporter::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod alert;
pub mod structured;

// Re-export commonly used items
pub use alert::{create_alerter, Alerter, FailureAlert, SmtpAlerter};
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a triggered export
///
/// # Example
///
/// ```no_run
/// use spo_exporter::log_export_start;
///
/// log_export_start!("http", "/srv/sharepoint");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($trigger:expr, $output_root:expr) => {
        tracing::info!(
            trigger = $trigger,
            output_root = %$output_root,
            "Export requested"
        );
    };
}

/// Log the completion of an export from its summary
///
/// # Example
///
/// ```no_run
/// use spo_exporter::log_export_complete;
/// use spo_exporter::core::export::ExportSummary;
///
/// let summary = ExportSummary::new();
/// log_export_complete!(&summary);
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($summary:expr) => {
        $summary.log_summary();
    };
}

/// Log an error with context
///
/// This is the single place a failed run is reported.
///
/// # Example
///
/// ```no_run
/// use spo_exporter::log_error_with_context;
/// use spo_exporter::domain::ExporterError;
///
/// let error = ExporterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Export failed");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            traceback = $error.source_chain().as_deref().unwrap_or(""),
            context = $context,
            "Error occurred"
        );
    };
}
