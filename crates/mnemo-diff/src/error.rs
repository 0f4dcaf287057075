// error.rs — Error types for the diff subsystem.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use mnemo_store::StoreError;

/// Errors that can occur while proposing, applying, or rejecting diffs.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The proposal is malformed (empty reasoning, missing snippet, …).
    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    /// The replace target is no longer present in current content — the
    /// primary conflict signal.
    #[error("target content not found — block may have changed since proposal")]
    SnippetNotFound,

    /// No pending diff exists with this id.
    #[error("no pending diff with id {0}")]
    NotFound(Uuid),

    /// The block store refused the resulting content or failed outright.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A diff record failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure in a diff store.
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
