// diff_store.rs — DiffStore trait and its memory and JSON-file impls.
//
// Pending diffs are keyed by diff id. The JSON store writes one file per
// record: `<dir>/<diff_id>.json` — easy to inspect manually, and listing
// is a scan-and-filter over small volumes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::DiffError;
use crate::pending_diff::PendingDiff;

/// Trait for persisting and retrieving pending diffs.
pub trait DiffStore: Send + Sync {
    /// Save a diff record. An existing record with the same id is
    /// overwritten.
    fn insert(&self, diff: &PendingDiff) -> Result<(), DiffError>;

    /// Get a specific diff by id.
    fn get(&self, diff_id: Uuid) -> Result<Option<PendingDiff>, DiffError>;

    /// Remove a diff by id. Returns false if it wasn't there.
    fn remove(&self, diff_id: Uuid) -> Result<bool, DiffError>;

    /// All diffs pending for a block, oldest first.
    fn list_for_block(&self, owner_id: &str, label: &str) -> Result<Vec<PendingDiff>, DiffError>;
}

/// Order a listing oldest-first, with the id as tie-break.
fn sort_pending(diffs: &mut [PendingDiff]) {
    diffs.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.diff_id.cmp(&b.diff_id))
    });
}

/// In-memory diff store.
#[derive(Debug, Default)]
pub struct MemoryDiffStore {
    diffs: RwLock<HashMap<Uuid, PendingDiff>>,
}

impl MemoryDiffStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiffStore for MemoryDiffStore {
    fn insert(&self, diff: &PendingDiff) -> Result<(), DiffError> {
        let mut diffs = self
            .diffs
            .write()
            .map_err(|e| DiffError::LockPoisoned(e.to_string()))?;
        diffs.insert(diff.diff_id, diff.clone());
        Ok(())
    }

    fn get(&self, diff_id: Uuid) -> Result<Option<PendingDiff>, DiffError> {
        let diffs = self
            .diffs
            .read()
            .map_err(|e| DiffError::LockPoisoned(e.to_string()))?;
        Ok(diffs.get(&diff_id).cloned())
    }

    fn remove(&self, diff_id: Uuid) -> Result<bool, DiffError> {
        let mut diffs = self
            .diffs
            .write()
            .map_err(|e| DiffError::LockPoisoned(e.to_string()))?;
        Ok(diffs.remove(&diff_id).is_some())
    }

    fn list_for_block(&self, owner_id: &str, label: &str) -> Result<Vec<PendingDiff>, DiffError> {
        let diffs = self
            .diffs
            .read()
            .map_err(|e| DiffError::LockPoisoned(e.to_string()))?;
        let mut matching: Vec<PendingDiff> = diffs
            .values()
            .filter(|d| d.owner_id == owner_id && d.block_label == label)
            .cloned()
            .collect();
        sort_pending(&mut matching);
        Ok(matching)
    }
}

/// JSON-file diff store: one `<dir>/<diff_id>.json` per pending diff.
pub struct JsonDiffStore {
    dir: PathBuf,
}

impl JsonDiffStore {
    /// Create a store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DiffError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| DiffError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn diff_path(&self, diff_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", diff_id))
    }
}

impl DiffStore for JsonDiffStore {
    fn insert(&self, diff: &PendingDiff) -> Result<(), DiffError> {
        let path = self.diff_path(diff.diff_id);
        let json = serde_json::to_string_pretty(diff)?;
        fs::write(&path, json).map_err(|source| DiffError::Io { path, source })?;
        Ok(())
    }

    fn get(&self, diff_id: Uuid) -> Result<Option<PendingDiff>, DiffError> {
        let path = self.diff_path(diff_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|source| DiffError::Io { path, source })?;
        let diff = serde_json::from_str(&json)?;
        Ok(Some(diff))
    }

    fn remove(&self, diff_id: Uuid) -> Result<bool, DiffError> {
        let path = self.diff_path(diff_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| DiffError::Io { path, source })?;
        Ok(true)
    }

    fn list_for_block(&self, owner_id: &str, label: &str) -> Result<Vec<PendingDiff>, DiffError> {
        let mut matching = Vec::new();

        let entries = fs::read_dir(&self.dir).map_err(|source| DiffError::Io {
            path: self.dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| DiffError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Ok(json) = fs::read_to_string(&path) {
                    if let Ok(diff) = serde_json::from_str::<PendingDiff>(&json) {
                        if diff.owner_id == owner_id && diff.block_label == label {
                            matching.push(diff);
                        }
                    }
                }
            }
        }

        sort_pending(&mut matching);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending_diff::{Confidence, Operation};
    use tempfile::tempdir;

    fn test_diff(owner: &str, label: &str) -> PendingDiff {
        PendingDiff::new(
            owner.to_string(),
            label.to_string(),
            None,
            Operation::Append,
            String::new(),
            "notes = \"studied today\"".to_string(),
            "observed a study session".to_string(),
            Confidence::Medium,
            "agent-1".to_string(),
        )
    }

    #[test]
    fn memory_store_insert_get_remove() {
        let store = MemoryDiffStore::new();
        let diff = test_diff("u1", "progress");
        let id = diff.diff_id;

        store.insert(&diff).unwrap();
        assert!(store.get(id).unwrap().is_some());

        assert!(store.remove(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert!(!store.remove(id).unwrap());
    }

    #[test]
    fn memory_store_lists_only_matching_block() {
        let store = MemoryDiffStore::new();
        store.insert(&test_diff("u1", "progress")).unwrap();
        store.insert(&test_diff("u1", "persona")).unwrap();
        store.insert(&test_diff("u2", "progress")).unwrap();

        let listed = store.list_for_block("u1", "progress").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].owner_id, "u1");
        assert_eq!(listed[0].block_label, "progress");
    }

    #[test]
    fn listing_is_oldest_first() {
        let store = MemoryDiffStore::new();
        let first = test_diff("u1", "progress");
        let second = test_diff("u1", "progress");
        store.insert(&second).unwrap();
        store.insert(&first).unwrap();

        let listed = store.list_for_block("u1", "progress").unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at <= listed[1].created_at);
    }

    #[test]
    fn json_store_round_trips_records() {
        let dir = tempdir().unwrap();
        let store = JsonDiffStore::new(dir.path().join("diffs")).unwrap();
        let diff = test_diff("u1", "progress");
        let id = diff.diff_id;

        store.insert(&diff).unwrap();
        let loaded = store.get(id).unwrap().unwrap();
        assert_eq!(loaded.diff_id, id);
        assert_eq!(loaded.new_value, diff.new_value);
        assert!(loaded.verify_hash());

        assert!(store.remove(id).unwrap());
        assert!(!store.remove(id).unwrap());
    }

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diffs");
        let diff = test_diff("u1", "progress");
        let id = diff.diff_id;

        {
            let store = JsonDiffStore::new(&path).unwrap();
            store.insert(&diff).unwrap();
        }

        {
            let store = JsonDiffStore::new(&path).unwrap();
            assert!(store.get(id).unwrap().is_some());
            assert_eq!(store.list_for_block("u1", "progress").unwrap().len(), 1);
        }
    }
}
