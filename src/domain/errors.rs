//! Domain error types
//!
//! This module defines the error hierarchy for the exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database connectivity or query errors
    #[error("Database error: {0}")]
    Database(String),

    /// Malformed source data or result sets
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// HTTP trigger errors
    #[error("Server error: {0}")]
    Server(String),

    /// Alert delivery errors
    #[error("Alert error: {0}")]
    Alert(String),

    /// An error annotated with the step that was being attempted
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ExporterError>,
    },

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Errors raised while shaping rows and XML records
///
/// These cover the "malformed source data" class: result sets that break the
/// driver contract and XML records missing the fields a mapping expects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// A result row does not have one value per column name
    #[error("Row {row} has {actual} values but the result set has {expected} columns")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A required child field (or its text) is absent
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    /// Ancestor depth beyond the node's ancestry chain
    #[error("Ancestor depth {depth} is out of range (ancestry has {available} nodes)")]
    AncestorOutOfRange { depth: usize, available: usize },

    /// The source node is not contained in the given root
    #[error("Node is not a descendant of the given root")]
    NotDescendant,

    /// Invalid XML input
    #[error("Invalid XML: {0}")]
    XmlParse(String),

    /// A value cannot be bound to the target column type
    #[error("Cannot bind value '{value}' as {target}")]
    InvalidParameter { value: String, target: String },

    /// Table names must be plain (optionally schema-qualified) identifiers
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),
}

impl ExporterError {
    /// Render the chain of underlying causes, if any
    ///
    /// Used as the `traceback` of the trigger's error payload.
    pub fn source_chain(&self) -> Option<String> {
        let mut causes = Vec::new();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }

        if causes.is_empty() {
            None
        } else {
            Some(causes.join("\ncaused by: "))
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}
