//! Declarative column specifications
//!
//! [`ColumnSpec`] is the configuration form of a [`FieldExtractor`], so import
//! mappings can be written in TOML:
//!
//! ```toml
//! [[import.tables]]
//! table = "Litmos_Users"
//! record_element = "User"
//! columns = [
//!     { type = "value", field = "Id" },
//!     { type = "string", field = "FirstName" },
//!     { type = "username", field = "Email" },
//!     { type = "bit", field = "Active" },
//!     { type = "constant", value = "'Litmos'" },
//!     { type = "ancestor", depth = 2, inner = { type = "string", field = "Name" } },
//! ]
//! ```

use super::fields::{FieldExtractor, DEFAULT_VALUE};
use serde::{Deserialize, Serialize};

/// One column of an import mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnSpec {
    /// Quoted text of a child field
    String { field: String },

    /// Unquoted text of a child field with a default
    Value {
        field: String,
        #[serde(default = "default_value")]
        default: String,
    },

    /// Pre-formatted literal
    Constant { value: String },

    /// Loose boolean as a bit
    Bit { field: String },

    /// Local part of an e-mail address
    Username { field: String },

    /// Inner column read from an ancestor of the record
    Ancestor { depth: usize, inner: Box<ColumnSpec> },
}

fn default_value() -> String {
    DEFAULT_VALUE.to_string()
}

impl ColumnSpec {
    /// Build the extractor described by this spec
    pub fn to_extractor(&self) -> FieldExtractor {
        match self {
            ColumnSpec::String { field } => FieldExtractor::string(field.clone()),
            ColumnSpec::Value { field, default } => {
                FieldExtractor::value_or(field.clone(), default.clone())
            }
            ColumnSpec::Constant { value } => FieldExtractor::constant(value.clone()),
            ColumnSpec::Bit { field } => FieldExtractor::boolean_bit(field.clone()),
            ColumnSpec::Username { field } => FieldExtractor::username_from_email(field.clone()),
            ColumnSpec::Ancestor { depth, inner } => {
                FieldExtractor::ancestor(*depth, inner.to_extractor())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::xml::XmlDocument;

    #[derive(Deserialize)]
    struct Wrapper {
        columns: Vec<ColumnSpec>,
    }

    #[test]
    fn test_deserialize_from_toml() {
        let wrapper: Wrapper = toml::from_str(
            r#"
columns = [
    { type = "value", field = "Id" },
    { type = "value", field = "Score", default = "0" },
    { type = "ancestor", depth = 1, inner = { type = "string", field = "Name" } },
]
"#,
        )
        .unwrap();

        assert_eq!(
            wrapper.columns[0],
            ColumnSpec::Value {
                field: "Id".to_string(),
                default: "null".to_string()
            }
        );
        assert_eq!(
            wrapper.columns[2],
            ColumnSpec::Ancestor {
                depth: 1,
                inner: Box::new(ColumnSpec::String {
                    field: "Name".to_string()
                })
            }
        );
    }

    #[test]
    fn test_to_extractor() {
        let doc = XmlDocument::parse(
            "<Team><Name>Ops</Name><User><Email>a.b@c.org</Email><Active>no</Active></User></Team>",
        )
        .unwrap();
        let root = doc.root();
        let user = root.find("User").unwrap();

        let specs = vec![
            ColumnSpec::Username {
                field: "Email".into(),
            },
            ColumnSpec::Bit {
                field: "Active".into(),
            },
            ColumnSpec::Ancestor {
                depth: 1,
                inner: Box::new(ColumnSpec::String {
                    field: "Name".into(),
                }),
            },
        ];
        let literals: Vec<String> = specs
            .iter()
            .map(|spec| spec.to_extractor().literal(user, root).unwrap())
            .collect();

        assert_eq!(literals, vec!["'a.b'", "0", "'Ops'"]);
    }
}
