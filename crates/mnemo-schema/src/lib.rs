//! # mnemo-schema
//!
//! Schema declarations and content validation for memory blocks.
//!
//! A block is a TOML document owned by one user. Its schema declares the
//! named fields the block may contain, each field's kind ([`FieldKind`]:
//! string, list, or nested table) and an optional default. Schemas are pure
//! data — validation never touches storage.
//!
//! ## Key invariants
//!
//! - **Declared keys only**: every top-level key and every nested table key
//!   must be declared; validation names the offending key by dotted path.
//! - **Shape over subtype**: a field's kind (scalar vs list vs table) is
//!   enforced; the scalar subtype (bool vs string vs number) is not.

pub mod block_schema;
pub mod error;
pub mod field;
pub mod registry;
pub mod value;

pub use block_schema::{parse_schema_file, BlockSchema};
pub use error::SchemaError;
pub use field::{FieldKind, FieldSpec};
pub use registry::SchemaRegistry;
pub use value::FieldValue;
