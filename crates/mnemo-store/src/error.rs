// error.rs — Error types for the block store.

use std::path::PathBuf;

use thiserror::Error;

use mnemo_schema::SchemaError;

/// Errors that can occur during block store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Content failed schema validation — the store was not mutated.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No schema is registered for the block label being written.
    #[error("no schema registered for block `{0}`")]
    SchemaNotFound(String),

    /// An owner id or label that cannot address a block.
    #[error("invalid block key component `{0}`")]
    InvalidKey(String),

    /// Filesystem failure in a backend.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lock was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}
