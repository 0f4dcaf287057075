// block_store.rs — BlockStore: validated, per-block-serialized content access.
//
// The store is the only mutator of block content. Every commit validates
// against the registered schema first; every write for a given (owner,
// label) runs under that block's lock. `update` is the apply primitive
// higher layers use for read-modify-write cycles — the whole cycle holds
// the block lock, so a concurrent apply can never interleave.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use mnemo_schema::value::{parse_content, render_content};
use mnemo_schema::{BlockSchema, FieldValue, SchemaRegistry};

use crate::backend::{BlockKey, ContentBackend};
use crate::error::StoreError;

/// Failure of a read-modify-write cycle: either the store itself failed,
/// or the caller's transform did. Either way the block is untouched.
#[derive(Debug, Error)]
pub enum UpdateError<E>
where
    E: std::error::Error,
{
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Apply(E),
}

/// The authoritative store of block content for all owners.
pub struct BlockStore {
    backend: Box<dyn ContentBackend>,
    schemas: SchemaRegistry,
    write_locks: Mutex<HashMap<BlockKey, Arc<Mutex<()>>>>,
}

impl BlockStore {
    /// Create a store over the given backend and schema registry.
    pub fn new(backend: Box<dyn ContentBackend>, schemas: SchemaRegistry) -> Self {
        Self {
            backend,
            schemas,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The schema registry this store validates against.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Schema for a label, or `SchemaNotFound`.
    pub fn schema_for(&self, label: &str) -> Result<&BlockSchema, StoreError> {
        self.schemas
            .get(label)
            .ok_or_else(|| StoreError::SchemaNotFound(label.to_string()))
    }

    /// Current content of a block, or None if never initialized.
    pub fn read(&self, owner_id: &str, label: &str) -> Result<Option<String>, StoreError> {
        let key = BlockKey::new(owner_id, label)?;
        self.backend.load(&key)
    }

    /// Whether the block has ever been written.
    pub fn exists(&self, owner_id: &str, label: &str) -> Result<bool, StoreError> {
        let key = BlockKey::new(owner_id, label)?;
        self.backend.exists(&key)
    }

    /// All block labels written for an owner.
    pub fn list_labels(&self, owner_id: &str) -> Result<Vec<String>, StoreError> {
        self.backend.list_labels(owner_id)
    }

    /// Initialize a block from its schema defaults.
    ///
    /// Returns `true` if the block was created, `false` if it already
    /// existed (in which case its content is left alone).
    pub fn init(&self, owner_id: &str, label: &str) -> Result<bool, StoreError> {
        let key = BlockKey::new(owner_id, label)?;
        let lock = self.lock_handle(&key)?;
        let _guard = lock
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        if self.backend.exists(&key)? {
            return Ok(false);
        }

        let schema = self.schema_for(label)?;
        let content = schema.default_content()?;
        schema.validate(&content)?;
        self.backend.store(&key, &content)?;
        tracing::info!("initialized block {} from schema defaults", key);
        Ok(true)
    }

    /// Replace a block's content. Validates first; a failing write is a
    /// no-op on stored state.
    pub fn write(&self, owner_id: &str, label: &str, content: &str) -> Result<(), StoreError> {
        self.update(owner_id, label, |_| Ok::<_, StoreError>(content.to_string()))
            .map_err(|err| match err {
                UpdateError::Store(e) | UpdateError::Apply(e) => e,
            })?;
        Ok(())
    }

    /// Run a read-modify-write cycle under the block's write lock.
    ///
    /// The closure receives the current content (None if the block was
    /// never initialized) and returns the full replacement content. The
    /// result is validated against the schema and committed before the
    /// lock is released. Returns the committed content.
    pub fn update<E, F>(
        &self,
        owner_id: &str,
        label: &str,
        f: F,
    ) -> Result<String, UpdateError<E>>
    where
        E: std::error::Error,
        F: FnOnce(Option<&str>) -> Result<String, E>,
    {
        let key = BlockKey::new(owner_id, label).map_err(UpdateError::Store)?;
        let lock = self.lock_handle(&key).map_err(UpdateError::Store)?;
        let _guard = lock
            .lock()
            .map_err(|e| UpdateError::Store(StoreError::LockPoisoned(e.to_string())))?;

        let current = self.backend.load(&key).map_err(UpdateError::Store)?;
        let new_content = f(current.as_deref()).map_err(UpdateError::Apply)?;

        let schema = self.schema_for(label).map_err(UpdateError::Store)?;
        schema
            .validate(&new_content)
            .map_err(|e| UpdateError::Store(e.into()))?;

        self.backend
            .store(&key, &new_content)
            .map_err(UpdateError::Store)?;
        tracing::debug!("committed {} bytes to block {}", new_content.len(), key);
        Ok(new_content)
    }

    /// Read a single top-level field as a typed value.
    pub fn read_field(
        &self,
        owner_id: &str,
        label: &str,
        field: &str,
    ) -> Result<Option<FieldValue>, StoreError> {
        let Some(content) = self.read(owner_id, label)? else {
            return Ok(None);
        };
        let table = parse_content(&content)?;
        Ok(table.get(field).map(FieldValue::from_toml))
    }

    /// Replace a single top-level field, leaving the rest of the block
    /// untouched.
    pub fn write_field(
        &self,
        owner_id: &str,
        label: &str,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        self.update(owner_id, label, |current| {
            let mut table = match current {
                Some(text) => parse_content(text)?,
                None => toml::Table::new(),
            };
            table.insert(field.to_string(), value.to_toml());
            render_content(&table).map_err(StoreError::from)
        })
        .map_err(|err| match err {
            UpdateError::Store(e) | UpdateError::Apply(e) => e,
        })?;
        Ok(())
    }

    fn lock_handle(&self, key: &BlockKey) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut locks = self
            .write_locks
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(Arc::clone(locks.entry(key.clone()).or_default()))
    }
}
