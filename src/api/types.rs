//! Response bodies of the HTTP trigger

use crate::core::export::ExportSummary;
use crate::domain::ExporterError;
use serde::Serialize;

/// Body of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteResponse {
    /// Always `true`
    pub result: bool,

    /// What the run wrote
    pub summary: ExportSummary,
}

impl ExecuteResponse {
    pub fn new(summary: ExportSummary) -> Self {
        Self {
            result: true,
            summary,
        }
    }
}

/// Body of a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Always `"Error"`
    pub result: &'static str,

    /// Top-level error message
    pub message: String,

    /// Underlying causes, one per line, or `null`
    pub traceback: Option<String>,
}

impl ErrorResponse {
    pub fn from_error(error: &ExporterError) -> Self {
        Self {
            result: "Error",
            message: error.to_string(),
            traceback: error.source_chain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransformError;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let err: ExporterError = TransformError::NotDescendant.into();
        let body = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();

        assert_eq!(body["result"], json!("Error"));
        assert_eq!(
            body["message"],
            json!("Transform error: Node is not a descendant of the given root")
        );
        assert_eq!(
            body["traceback"],
            json!("Node is not a descendant of the given root")
        );
    }

    #[test]
    fn test_error_response_null_traceback() {
        let err = ExporterError::Database("connection refused".to_string());
        let body = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
        assert!(body["traceback"].is_null());
    }

    #[test]
    fn test_execute_response_shape() {
        let body = serde_json::to_value(ExecuteResponse::new(ExportSummary::new())).unwrap();
        assert_eq!(body["result"], json!(true));
        assert!(body["summary"]["documents"].is_array());
    }
}
