//! Parameterized insert statements built from extracted values

use super::fields::SqlValue;
use crate::domain::errors::TransformError;
use crate::domain::result::TransformResult;
use regex::Regex;
use std::sync::OnceLock;

fn table_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("table name pattern is valid")
    })
}

/// One row to insert into a table
///
/// The statement text uses positional placeholders; values travel separately
/// and are bound by the database adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    values: Vec<SqlValue>,
}

impl InsertStatement {
    /// Create an insert statement for `table`
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidTableName`] unless the name is an
    /// identifier, optionally schema-qualified (`schema.table`).
    pub fn new(table: impl Into<String>, values: Vec<SqlValue>) -> TransformResult<Self> {
        let table = table.into();
        if !table_name_pattern().is_match(&table) {
            return Err(TransformError::InvalidTableName(table));
        }
        Ok(Self { table, values })
    }

    /// Target table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Values in column order
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Statement text with `$n` placeholders
    ///
    /// ```
    /// use spo_exporter::core::transform::{InsertStatement, SqlValue};
    ///
    /// let stmt = InsertStatement::new(
    ///     "Litmos_Users",
    ///     vec![SqlValue::Token("1".into()), SqlValue::Text("Jane".into())],
    /// ).unwrap();
    /// assert_eq!(stmt.sql(), r#"insert into "Litmos_Users" values ($1, $2)"#);
    /// ```
    pub fn sql(&self) -> String {
        let placeholders: Vec<String> = (1..=self.values.len()).map(|i| format!("${i}")).collect();
        format!(
            "insert into {} values ({})",
            self.quoted_table(),
            placeholders.join(", ")
        )
    }

    /// Statement with values interpolated as SQL literals
    ///
    /// Only for display (dry runs and logs); execution always binds parameters.
    pub fn render_literal(&self) -> String {
        let literals: Vec<String> = self.values.iter().map(SqlValue::to_literal).collect();
        format!(
            "insert into {} values ({})",
            self.quoted_table(),
            literals.join(",")
        )
    }

    fn quoted_table(&self) -> String {
        self.table
            .split('.')
            .map(|part| format!("\"{part}\""))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_placeholders() {
        let stmt = InsertStatement::new(
            "litmos.Users",
            vec![
                SqlValue::Token("1".into()),
                SqlValue::Text("a".into()),
                SqlValue::Bit(false),
            ],
        )
        .unwrap();
        assert_eq!(stmt.sql(), r#"insert into "litmos"."Users" values ($1, $2, $3)"#);
    }

    #[test]
    fn test_render_literal() {
        let stmt = InsertStatement::new(
            "Users",
            vec![
                SqlValue::Text("O'Brien".into()),
                SqlValue::Literal("null".into()),
                SqlValue::Bit(true),
            ],
        )
        .unwrap();
        assert_eq!(
            stmt.render_literal(),
            r#"insert into "Users" values ('O''Brien',null,1)"#
        );
    }

    #[test]
    fn test_rejects_injected_table_name() {
        let result = InsertStatement::new("Users; drop table Users", vec![]);
        assert!(matches!(result, Err(TransformError::InvalidTableName(_))));
    }

    #[test]
    fn test_rejects_empty_table_name() {
        assert!(InsertStatement::new("", vec![]).is_err());
    }
}
