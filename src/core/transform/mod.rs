//! Data shaping
//!
//! This module reshapes data on both sides of the exporter:
//! - [`recordset`] - tabular query results into name-keyed records
//! - [`fields`] - XML records into typed column values
//! - [`mapping`] - declarative (configuration) form of the field extractors
//! - [`insert`] - parameterized insert statements

pub mod fields;
pub mod insert;
pub mod mapping;
pub mod recordset;

pub use fields::{parse_bool, sql_escape, BindValue, FieldExtractor, SqlValue};
pub use insert::InsertStatement;
pub use mapping::ColumnSpec;
pub use recordset::map_rows;
