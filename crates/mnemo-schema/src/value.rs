// value.rs — The typed value tree for block fields.
//
// FieldValue is the tagged union the converter and store recurse over:
// Scalar | List | Table. Keeping it an enum means every consumer match is
// exhaustive — a new shape cannot be half-supported.
//
// Scalars carry their human rendering as text. Subtype (bool vs number vs
// string) is deliberately dropped here; shape is what must survive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A field's value: scalar text, a list of scalar text, or a nested table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single scalar, carried as its text rendering.
    Scalar(String),
    /// A flat list of scalars.
    List(Vec<String>),
    /// A nested mapping, recursively.
    Table(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Build a value tree from a parsed TOML value.
    pub fn from_toml(value: &toml::Value) -> Self {
        match value {
            toml::Value::Array(items) => {
                FieldValue::List(items.iter().map(scalar_text).collect())
            }
            toml::Value::Table(table) => FieldValue::Table(
                table
                    .iter()
                    .map(|(key, val)| (key.clone(), FieldValue::from_toml(val)))
                    .collect(),
            ),
            scalar => FieldValue::Scalar(scalar_text(scalar)),
        }
    }

    /// Convert back to a TOML value. Scalars become TOML strings — the
    /// original subtype is not resurrected.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            FieldValue::Scalar(text) => toml::Value::String(text.clone()),
            FieldValue::List(items) => toml::Value::Array(
                items
                    .iter()
                    .map(|item| toml::Value::String(item.clone()))
                    .collect(),
            ),
            FieldValue::Table(entries) => {
                let mut table = toml::Table::new();
                for (key, val) in entries {
                    table.insert(key.clone(), val.to_toml());
                }
                toml::Value::Table(table)
            }
        }
    }

    /// True if this value is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, FieldValue::Table(_))
    }
}

/// Render a TOML scalar as plain text (strings lose their quotes).
pub fn scalar_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Parse structured block content into a TOML table.
pub fn parse_content(text: &str) -> Result<toml::Table, SchemaError> {
    text.parse::<toml::Table>()
        .map_err(|e| SchemaError::Parse(e.to_string()))
}

/// Serialize a TOML table back to structured block content.
pub fn render_content(table: &toml::Table) -> Result<String, SchemaError> {
    toml::to_string(table).map_err(|e| SchemaError::Serialize(e.to_string()))
}
