//! Error context extension trait
//!
//! Works like `anyhow::Context` but keeps the library on [`ExporterError`].
//! The wrapped error stays reachable through `source()`, which is what the
//! trigger reports as its traceback.
//!
//! ```rust
//! use spo_exporter::domain::{ExporterError, Result};
//! use spo_exporter::domain::context::ResultExt;
//!
//! fn read_query(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).context(format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::ExporterError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ExporterError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| ExporterError::Context {
            context: context.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| ExporterError::Context {
            context: f().to_string(),
            source: Box::new(e.into()),
        })
    }
}
