// field.rs — Field kind and field spec declarations.
//
// A FieldSpec declares one named slot in a block: its kind, an optional
// default value, and (for table kinds) the declared sub-fields. Specs
// deserialize from TOML so whole schemas can live in a config file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of value a field holds. Fixed by schema, never inferred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A scalar value. Subtype (bool, number, text) is not enforced.
    String,
    /// A flat list of scalar values.
    List,
    /// A nested mapping of declared sub-fields.
    Table,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "a string"),
            FieldKind::List => write!(f, "a list"),
            FieldKind::Table => write!(f, "a table"),
        }
    }
}

/// Declaration of a single field within a block schema.
///
/// Example TOML declaration:
/// ```toml
/// [persona.fields.preferences]
/// kind = "table"
///
/// [persona.fields.preferences.fields.diet]
/// kind = "string"
/// default = "unknown"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// What shape of value this field holds.
    pub kind: FieldKind,

    /// Default value used when a block is initialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<toml::Value>,

    /// Declared sub-fields (only meaningful for `kind = "table"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldSpec>,
}

impl FieldSpec {
    /// A scalar field with no default.
    pub fn string() -> Self {
        Self {
            kind: FieldKind::String,
            default: None,
            fields: BTreeMap::new(),
        }
    }

    /// A list field with no default.
    pub fn list() -> Self {
        Self {
            kind: FieldKind::List,
            default: None,
            fields: BTreeMap::new(),
        }
    }

    /// A table field with the given sub-fields.
    pub fn table(fields: BTreeMap<String, FieldSpec>) -> Self {
        Self {
            kind: FieldKind::Table,
            default: None,
            fields,
        }
    }

    /// Set the default value and return self (builder pattern).
    pub fn with_default(mut self, default: impl Into<toml::Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}
