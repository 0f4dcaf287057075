// backend.rs — The content backend abstraction and the in-memory impl.
//
// A ContentBackend is a key-value-of-text store: one structured-text
// document per (owner, label). Backends synchronize internally so a single
// instance can be shared across threads; ordering between writers is the
// BlockStore's job, not the backend's.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Addresses one block: an owner-scoped label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockKey {
    /// The user whose memory this block belongs to.
    pub owner_id: String,
    /// The block label, unique within the owner's namespace.
    pub label: String,
}

impl BlockKey {
    /// Create a key after checking both components can address a block.
    ///
    /// Components must be non-empty and free of path separators and `..` —
    /// keys feed directly into backend file paths.
    pub fn new(owner_id: &str, label: &str) -> Result<Self, StoreError> {
        for component in [owner_id, label] {
            if component.is_empty()
                || component.contains('/')
                || component.contains('\\')
                || component == ".."
            {
                return Err(StoreError::InvalidKey(component.to_string()));
            }
        }
        Ok(Self {
            owner_id: owner_id.to_string(),
            label: label.to_string(),
        })
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner_id, self.label)
    }
}

/// Trait for persisting and retrieving block content by key.
///
/// Implementations must be internally synchronized (`&self` methods,
/// `Send + Sync`) — the store shares one backend across threads.
pub trait ContentBackend: Send + Sync {
    /// Current content for a key, or None if the block was never written.
    fn load(&self, key: &BlockKey) -> Result<Option<String>, StoreError>;

    /// Replace the content for a key. Readers must never observe a partial
    /// write.
    fn store(&self, key: &BlockKey, content: &str) -> Result<(), StoreError>;

    /// Whether the key has ever been written.
    fn exists(&self, key: &BlockKey) -> Result<bool, StoreError> {
        Ok(self.load(key)?.is_some())
    }

    /// All labels written for an owner, sorted.
    fn list_labels(&self, owner_id: &str) -> Result<Vec<String>, StoreError>;
}

/// In-memory backend. Snapshot-consistent: readers get owned clones.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    blocks: RwLock<HashMap<BlockKey, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentBackend for MemoryBackend {
    fn load(&self, key: &BlockKey) -> Result<Option<String>, StoreError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(blocks.get(key).cloned())
    }

    fn store(&self, key: &BlockKey, content: &str) -> Result<(), StoreError> {
        let mut blocks = self
            .blocks
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        blocks.insert(key.clone(), content.to_string());
        Ok(())
    }

    fn list_labels(&self, owner_id: &str) -> Result<Vec<String>, StoreError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut labels: Vec<String> = blocks
            .keys()
            .filter(|key| key.owner_id == owner_id)
            .map(|key| key.label.clone())
            .collect();
        labels.sort();
        Ok(labels)
    }
}
