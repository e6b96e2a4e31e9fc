//! Result type alias for the exporter
//!
//! This module provides a convenient Result type alias that uses ExporterError
//! as the error type.

use super::errors::ExporterError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use spo_exporter::domain::result::Result;
/// use spo_exporter::domain::errors::ExporterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExporterError::Export("output root is not a directory".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Result alias for row and record shaping
pub type TransformResult<T> = std::result::Result<T, super::errors::TransformError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::TransformError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> TransformResult<i32> {
            Err(TransformError::NotDescendant)
        }

        fn outer() -> Result<i32> {
            let value = inner()?;
            Ok(value)
        }

        assert!(outer().is_err());
        Ok(())
    }
}
