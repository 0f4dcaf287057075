// registry.rs — Label → schema lookup.
//
// Built once at startup (from code or a schema file) and then shared
// read-only behind whatever handle the store uses. No ambient globals.

use std::collections::BTreeMap;

use crate::block_schema::{parse_schema_file, BlockSchema};
use crate::error::SchemaError;

/// Registry of block schemas, keyed by block label.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, BlockSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous schema for its label.
    pub fn register(&mut self, schema: BlockSchema) {
        self.schemas.insert(schema.label.clone(), schema);
    }

    /// Load every schema declared in a schema file. Returns how many were
    /// registered.
    pub fn load_toml_str(&mut self, text: &str) -> Result<usize, SchemaError> {
        let schemas = parse_schema_file(text)?;
        let count = schemas.len();
        for schema in schemas {
            self.register(schema);
        }
        Ok(count)
    }

    /// Look up the schema for a block label.
    pub fn get(&self, label: &str) -> Option<&BlockSchema> {
        self.schemas.get(label)
    }

    /// All registered labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }
}
