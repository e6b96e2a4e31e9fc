//! Row mapping from tabular results to name-keyed records

use crate::domain::errors::TransformError;
use crate::domain::record::{Record, ResultSet};
use crate::domain::result::TransformResult;

/// Map a result set to records, one per row, in row order
///
/// Each record pairs every value with the column name at the same position.
/// Values are taken as the database adapter produced them.
///
/// # Errors
///
/// Returns [`TransformError::ColumnCountMismatch`] for the first row whose
/// length differs from the number of column names. No partial output is
/// returned.
///
/// # Examples
///
/// ```
/// use spo_exporter::core::transform::map_rows;
/// use spo_exporter::domain::record::ResultSet;
/// use serde_json::json;
///
/// let rs = ResultSet::new(
///     vec!["Id".to_string(), "Title".to_string()],
///     vec![vec![json!(1), json!("Intro to SQL")]],
/// );
/// let records = map_rows(&rs).unwrap();
/// assert_eq!(records[0]["Title"], json!("Intro to SQL"));
/// ```
pub fn map_rows(result_set: &ResultSet) -> TransformResult<Vec<Record>> {
    let expected = result_set.columns.len();

    result_set
        .rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            if row.len() != expected {
                return Err(TransformError::ColumnCountMismatch {
                    row: row_index,
                    expected,
                    actual: row.len(),
                });
            }

            Ok(result_set
                .columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn courses() -> ResultSet {
        ResultSet::new(
            vec!["Id".into(), "Title".into(), "Active".into()],
            vec![
                vec![json!(1), json!("Intro"), json!(true)],
                vec![json!(2), Value::Null, json!(false)],
            ],
        )
    }

    #[test]
    fn test_map_rows_pairs_values_with_columns() {
        let rs = courses();
        let records = map_rows(&rs).unwrap();

        assert_eq!(records.len(), rs.rows.len());
        for (i, record) in records.iter().enumerate() {
            for (j, column) in rs.columns.iter().enumerate() {
                assert_eq!(record[column], rs.rows[i][j]);
            }
        }
    }

    #[test]
    fn test_map_rows_preserves_column_order() {
        let records = map_rows(&courses()).unwrap();
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["Id", "Title", "Active"]);
    }

    #[test]
    fn test_map_rows_empty_result_set() {
        let rs = ResultSet::empty(vec!["Id".into()]);
        assert!(map_rows(&rs).unwrap().is_empty());
    }

    #[test]
    fn test_map_rows_rejects_short_row() {
        let mut rs = courses();
        rs.rows.push(vec![json!(3)]);

        let err = map_rows(&rs).unwrap_err();
        assert_eq!(
            err,
            TransformError::ColumnCountMismatch {
                row: 2,
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_map_rows_rejects_long_row() {
        let rs = ResultSet::new(vec!["Id".into()], vec![vec![json!(1), json!(2)]]);
        assert!(map_rows(&rs).is_err());
    }
}
