//! Field extractors for XML record imports
//!
//! A [`FieldExtractor`] reads one column's value from an XML record. The
//! constructors form a small declarative vocabulary so a table mapping is
//! just an ordered list of extractors:
//!
//! ```
//! use spo_exporter::core::transform::FieldExtractor;
//! use spo_exporter::domain::xml::XmlDocument;
//!
//! let doc = XmlDocument::parse(
//!     "<Users><User><Name>O'Brien</Name><Active>Yes</Active></User></Users>",
//! ).unwrap();
//! let root = doc.root();
//! let user = root.find("User").unwrap();
//!
//! let columns = [
//!     FieldExtractor::string("Name"),
//!     FieldExtractor::boolean_bit("Active"),
//!     FieldExtractor::constant("'Litmos'"),
//! ];
//! let literals: Vec<String> = columns
//!     .iter()
//!     .map(|c| c.literal(user, root).unwrap())
//!     .collect();
//! assert_eq!(literals, vec!["'O''Brien'", "1", "'Litmos'"]);
//! ```
//!
//! Extracted values are typed ([`SqlValue`]). They render to the legacy SQL
//! literal form with [`SqlValue::to_literal`] and bind as statement
//! parameters through [`SqlValue::to_bind`].

use crate::domain::errors::TransformError;
use crate::domain::result::TransformResult;
use crate::domain::xml::Node;
use std::fmt;
use std::sync::Arc;

/// Text values accepted as `true` by [`FieldExtractor::boolean_bit`]
const TRUE_VALUES: [&str; 4] = ["yes", "true", "t", "1"];

/// Default substituted by [`FieldExtractor::value`] for absent or empty fields
pub const DEFAULT_VALUE: &str = "null";

/// Value extracted for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Text rendered as a quoted, escaped literal
    Text(String),

    /// Unquoted token such as a number; escaped when rendered
    Token(String),

    /// Pre-formatted literal, rendered verbatim
    Literal(String),

    /// Bit rendered as `1` or `0`
    Bit(bool),

    /// Placeholder for an absent string field; renders as nothing
    Empty,
}

/// Parameter form of a [`SqlValue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    /// SQL NULL
    Null,

    /// Text, converted to the column type by the database adapter
    Text(String),

    /// Boolean or bit
    Bit(bool),
}

impl SqlValue {
    /// Render as an SQL literal fragment
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Text(text) => format!("'{}'", sql_escape(text)),
            SqlValue::Token(token) => sql_escape(token),
            SqlValue::Literal(literal) => literal.clone(),
            SqlValue::Bit(true) => "1".to_string(),
            SqlValue::Bit(false) => "0".to_string(),
            SqlValue::Empty => String::new(),
        }
    }

    /// Convert to a bindable parameter
    ///
    /// Verbatim literals are interpreted: `null` (any case) becomes NULL and a
    /// single-quoted literal becomes its unescaped text.
    pub fn to_bind(&self) -> BindValue {
        match self {
            SqlValue::Text(text) | SqlValue::Token(text) => BindValue::Text(text.clone()),
            SqlValue::Literal(literal) => parse_literal(literal),
            SqlValue::Bit(bit) => BindValue::Bit(*bit),
            SqlValue::Empty => BindValue::Null,
        }
    }
}

fn parse_literal(literal: &str) -> BindValue {
    let trimmed = literal.trim();
    if trimmed.eq_ignore_ascii_case("null") {
        return BindValue::Null;
    }
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        let inner = &trimmed[1..trimmed.len() - 1];
        return BindValue::Text(inner.replace("''", "'"));
    }
    BindValue::Text(literal.to_string())
}

/// Escape text for a single-quoted SQL literal by doubling quotes
pub fn sql_escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Loose boolean parsing: `yes`, `true`, `t` and `1`, case-insensitive
pub fn parse_bool(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRUE_VALUES.contains(&lowered.as_str())
}

type ExtractFn = dyn for<'a> Fn(Node<'a>, Node<'a>) -> TransformResult<SqlValue> + Send + Sync;

/// Reads one column value from an XML record
///
/// Every extractor is a function of the record node and the document root.
#[derive(Clone)]
pub struct FieldExtractor {
    kind: &'static str,
    extract: Arc<ExtractFn>,
}

impl FieldExtractor {
    fn from_fn<F>(kind: &'static str, extract: F) -> Self
    where
        F: for<'a> Fn(Node<'a>, Node<'a>) -> TransformResult<SqlValue> + Send + Sync + 'static,
    {
        Self {
            kind,
            extract: Arc::new(extract),
        }
    }

    /// Quoted text of child `name`
    ///
    /// An absent child yields [`SqlValue::Empty`] (rendered as an empty
    /// string, not `NULL`). A present child without text yields `''`.
    pub fn string(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_fn("string", move |source, _root| {
            Ok(match source.find(&name) {
                Some(field) => SqlValue::Text(field.text().unwrap_or_default().to_string()),
                None => SqlValue::Empty,
            })
        })
    }

    /// Unquoted text of child `name`, or `null` when absent or empty
    pub fn value(name: impl Into<String>) -> Self {
        Self::value_or(name, DEFAULT_VALUE)
    }

    /// Unquoted text of child `name`, or `default` (verbatim) when absent or empty
    pub fn value_or(name: impl Into<String>, default: impl Into<String>) -> Self {
        let name = name.into();
        let default = default.into();
        Self::from_fn("value", move |source, _root| {
            let text = source
                .find(&name)
                .and_then(|field| field.text())
                .unwrap_or_default();
            if text.is_empty() {
                Ok(SqlValue::Literal(default.clone()))
            } else {
                Ok(SqlValue::Token(text.to_string()))
            }
        })
    }

    /// A pre-formatted literal that ignores the record
    pub fn constant(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::from_fn("constant", move |_source, _root| {
            Ok(SqlValue::Literal(value.clone()))
        })
    }

    /// Child `name` parsed as a loose boolean, as bit `1`/`0`
    ///
    /// The field is required: an absent child or one without text is an error.
    pub fn boolean_bit(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_fn("boolean_bit", move |source, _root| {
            let text = required_text(source, &name)?;
            Ok(SqlValue::Bit(parse_bool(text)))
        })
    }

    /// Quoted local part (before the first `@`) of the e-mail in child `name`
    ///
    /// The field is required: an absent child or one without text is an error.
    pub fn username_from_email(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_fn("username_from_email", move |source, _root| {
            let text = required_text(source, &name)?;
            let username = text.split('@').next().unwrap_or_default();
            Ok(SqlValue::Text(username.to_string()))
        })
    }

    /// Apply `inner` to an ancestor of the record
    ///
    /// Depth 0 is the record itself, 1 its parent, and so on up to the root.
    pub fn ancestor(depth: usize, inner: FieldExtractor) -> Self {
        Self::from_fn("ancestor", move |source, root| {
            let chain = source.ancestry_within(root)?;
            let ancestor = chain
                .get(depth)
                .copied()
                .ok_or(TransformError::AncestorOutOfRange {
                    depth,
                    available: chain.len(),
                })?;
            inner.extract(ancestor, root)
        })
    }

    /// Extract the typed value for `source` within the document `root`
    pub fn extract<'a>(&self, source: Node<'a>, root: Node<'a>) -> TransformResult<SqlValue> {
        (self.extract)(source, root)
    }

    /// Extract and render as an SQL literal fragment
    pub fn literal<'a>(&self, source: Node<'a>, root: Node<'a>) -> TransformResult<String> {
        self.extract(source, root).map(|value| value.to_literal())
    }
}

impl fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldExtractor")
            .field("kind", &self.kind)
            .finish()
    }
}

fn required_text<'a>(source: Node<'a>, name: &str) -> TransformResult<&'a str> {
    source
        .find(name)
        .and_then(|field| field.text())
        .ok_or_else(|| TransformError::MissingField(name.to_string()))
}
