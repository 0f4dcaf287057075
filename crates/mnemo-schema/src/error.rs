// error.rs — Error types for schema validation.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors that can occur while validating block content against a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The content is not parseable as structured text at all.
    #[error("content is not valid structured text: {0}")]
    Parse(String),

    /// The content tree could not be serialized back to text.
    #[error("failed to serialize content: {0}")]
    Serialize(String),

    /// A key appears in the content that the schema does not declare.
    #[error("unknown field `{field}` in block `{block}`")]
    UnknownField { block: String, field: String },

    /// A declared field holds a value of the wrong shape.
    #[error("field `{field}` in block `{block}` expects {expected}, found {found}")]
    KindMismatch {
        block: String,
        field: String,
        expected: FieldKind,
        found: &'static str,
    },

    /// The schema declaration file itself is malformed.
    #[error("invalid schema declaration: {0}")]
    InvalidDeclaration(String),
}
