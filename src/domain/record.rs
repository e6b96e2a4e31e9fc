//! Tabular query output and its name-keyed record form

use serde_json::{Map, Value};

/// One row reshaped into a column-name keyed mapping
///
/// Keys keep the column order of the originating result set.
pub type Record = Map<String, Value>;

/// Tabular query output: column names plus positional rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names, one per positional column
    pub columns: Vec<String>,

    /// Rows of scalar values
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Create a result set from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Create a result set with columns but no rows
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_result_set() {
        let rs = ResultSet::empty(vec!["Id".to_string()]);
        assert!(rs.is_empty());
        assert_eq!(rs.columns, vec!["Id"]);
    }

    #[test]
    fn test_len() {
        let rs = ResultSet::new(
            vec!["Id".to_string()],
            vec![vec![json!(1)], vec![json!(2)]],
        );
        assert_eq!(rs.len(), 2);
    }
}
