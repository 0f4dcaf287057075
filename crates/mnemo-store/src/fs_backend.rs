// fs_backend.rs — Filesystem content backend.
//
// One file per block: `<root>/<owner>/<label>.toml`. Writes land in a
// temp file in the same directory and are renamed into place, so a
// concurrent reader sees either the old content or the new — never a
// partial write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::backend::{BlockKey, ContentBackend};
use crate::error::StoreError;

/// Filesystem-backed content store.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Create a backend rooted at the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    fn owner_dir(&self, owner_id: &str) -> PathBuf {
        self.root.join(owner_id)
    }

    fn block_path(&self, key: &BlockKey) -> PathBuf {
        self.owner_dir(&key.owner_id)
            .join(format!("{}.toml", key.label))
    }
}

impl ContentBackend for FsBackend {
    fn load(&self, key: &BlockKey) -> Result<Option<String>, StoreError> {
        let path = self.block_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn store(&self, key: &BlockKey, content: &str) -> Result<(), StoreError> {
        let owner_dir = self.owner_dir(&key.owner_id);
        fs::create_dir_all(&owner_dir).map_err(|source| StoreError::Io {
            path: owner_dir.clone(),
            source,
        })?;

        let path = self.block_path(key);

        // Temp file in the same directory so the final rename is atomic.
        let mut tmp = NamedTempFile::new_in(&owner_dir).map_err(|source| StoreError::Io {
            path: owner_dir.clone(),
            source,
        })?;
        tmp.write_all(content.as_bytes())
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        tmp.persist(&path).map_err(|err| StoreError::Io {
            path: path.clone(),
            source: err.error,
        })?;

        Ok(())
    }

    fn exists(&self, key: &BlockKey) -> Result<bool, StoreError> {
        Ok(self.block_path(key).exists())
    }

    fn list_labels(&self, owner_id: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.owner_dir(owner_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut labels = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    labels.push(stem.to_string());
                }
            }
        }

        labels.sort();
        Ok(labels)
    }
}
