// block_schema.rs — Per-block field declarations and content validation.
//
// A BlockSchema declares the complete set of fields a block may hold.
// Validation is pure: parse the content text, walk it against the declared
// specs, and report the first offending key by dotted path. No I/O.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::SchemaError;
use crate::field::{FieldKind, FieldSpec};
use crate::value::{parse_content, render_content};

/// The schema for one block label: its declared fields, recursively.
#[derive(Debug, Clone)]
pub struct BlockSchema {
    /// The block label this schema validates.
    pub label: String,
    /// Declared top-level fields.
    pub fields: BTreeMap<String, FieldSpec>,
}

impl BlockSchema {
    /// Create a schema from a label and field declarations.
    pub fn new(label: impl Into<String>, fields: BTreeMap<String, FieldSpec>) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }

    /// Validate structured content against this schema.
    ///
    /// Confirms every key (top-level and nested) is declared and that each
    /// declared field holds a value of the declared shape. Scalar subtype
    /// is never checked — `age = 25` satisfies a `string` field.
    pub fn validate(&self, content: &str) -> Result<(), SchemaError> {
        let table = parse_content(content)?;
        self.validate_table("", &self.fields, &table)
    }

    fn validate_table(
        &self,
        prefix: &str,
        specs: &BTreeMap<String, FieldSpec>,
        table: &toml::Table,
    ) -> Result<(), SchemaError> {
        for (key, value) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            let spec = specs.get(key).ok_or_else(|| SchemaError::UnknownField {
                block: self.label.clone(),
                field: path.clone(),
            })?;

            match spec.kind {
                FieldKind::Table => match value {
                    toml::Value::Table(inner) => {
                        self.validate_table(&path, &spec.fields, inner)?;
                    }
                    other => {
                        return Err(SchemaError::KindMismatch {
                            block: self.label.clone(),
                            field: path,
                            expected: FieldKind::Table,
                            found: shape_name(other),
                        });
                    }
                },
                FieldKind::List => match value {
                    toml::Value::Array(items) => {
                        if items.iter().any(|item| item.is_table() || item.is_array()) {
                            return Err(SchemaError::KindMismatch {
                                block: self.label.clone(),
                                field: path,
                                expected: FieldKind::List,
                                found: "a list of non-scalar items",
                            });
                        }
                    }
                    other => {
                        return Err(SchemaError::KindMismatch {
                            block: self.label.clone(),
                            field: path,
                            expected: FieldKind::List,
                            found: shape_name(other),
                        });
                    }
                },
                FieldKind::String => {
                    if value.is_table() || value.is_array() {
                        return Err(SchemaError::KindMismatch {
                            block: self.label.clone(),
                            field: path,
                            expected: FieldKind::String,
                            found: shape_name(value),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Serialized content built from field defaults, used when a block is
    /// explicitly initialized. Fields without defaults are omitted; table
    /// fields materialize when any sub-field has a default.
    pub fn default_content(&self) -> Result<String, SchemaError> {
        let table = defaults_for(&self.fields);
        render_content(&table)
    }
}

fn defaults_for(specs: &BTreeMap<String, FieldSpec>) -> toml::Table {
    let mut table = toml::Table::new();
    for (key, spec) in specs {
        match spec.kind {
            FieldKind::Table => {
                let nested = defaults_for(&spec.fields);
                if !nested.is_empty() {
                    table.insert(key.clone(), toml::Value::Table(nested));
                }
            }
            FieldKind::String | FieldKind::List => {
                if let Some(default) = &spec.default {
                    table.insert(key.clone(), default.clone());
                }
            }
        }
    }
    table
}

fn shape_name(value: &toml::Value) -> &'static str {
    match value {
        toml::Value::String(_) => "a string",
        toml::Value::Integer(_) => "an integer",
        toml::Value::Float(_) => "a float",
        toml::Value::Boolean(_) => "a boolean",
        toml::Value::Datetime(_) => "a datetime",
        toml::Value::Array(_) => "a list",
        toml::Value::Table(_) => "a table",
    }
}

/// One block's declaration inside a schema file.
#[derive(Debug, Deserialize)]
struct SchemaDecl {
    #[serde(default)]
    fields: BTreeMap<String, FieldSpec>,
}

/// Parse a schema file declaring one or more block schemas.
///
/// ```toml
/// [persona.fields.name]
/// kind = "string"
/// default = "unknown"
///
/// [persona.fields.preferences]
/// kind = "table"
///
/// [persona.fields.preferences.fields.diet]
/// kind = "string"
/// ```
pub fn parse_schema_file(text: &str) -> Result<Vec<BlockSchema>, SchemaError> {
    let decls: BTreeMap<String, SchemaDecl> =
        toml::from_str(text).map_err(|e| SchemaError::InvalidDeclaration(e.to_string()))?;
    Ok(decls
        .into_iter()
        .map(|(label, decl)| BlockSchema::new(label, decl.fields))
        .collect())
}
