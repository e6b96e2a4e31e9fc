//! Domain types for the exporter
//!
//! - **Error types** ([`ExporterError`], [`TransformError`])
//! - **Result aliases** ([`Result`], [`TransformResult`])
//! - **Tabular data** ([`ResultSet`], [`Record`])
//! - **XML trees** ([`XmlDocument`], [`Node`]) read by the field extractors
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExporterError>`]. Errors
//! propagate unchanged to the caller that started the run; the HTTP trigger
//! and the CLI are the only places that log them.
//!
//! ```rust
//! use spo_exporter::domain::{ResultSet, Result};
//! use spo_exporter::core::transform::map_rows;
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let rs = ResultSet::new(vec!["Id".into()], vec![vec![json!(1)]]);
//!     let records = map_rows(&rs)?;
//!     assert_eq!(records[0]["Id"], json!(1));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod context;
pub mod errors;
pub mod record;
pub mod result;
pub mod xml;

// Re-export commonly used types for convenience
pub use errors::{ExporterError, TransformError};
pub use record::{Record, ResultSet};
pub use result::{Result, TransformResult};
pub use xml::{Node, XmlDocument};
