// error.rs — Error types for the workflow facade.

use thiserror::Error;

use mnemo_convert::ConvertError;
use mnemo_diff::DiffError;
use mnemo_store::StoreError;

/// Errors surfaced to external callers of the workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The caller-supplied strategy string maps to no operation.
    #[error("unknown strategy `{0}` (expected append, replace, or full_replace)")]
    UnknownStrategy(String),

    /// The caller-supplied confidence string maps to no level.
    #[error("unknown confidence `{0}` (expected low, medium, or high)")]
    UnknownConfidence(String),

    /// The capability check refused this actor.
    #[error("`{actor}` is not allowed to approve this diff")]
    NotAuthorized { actor: String },

    /// A block that has never been initialized.
    #[error("block `{owner}/{label}` has not been initialized")]
    BlockNotFound { owner: String, label: String },

    /// Failure in the diff engine.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// Failure in the block store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure converting Markdown back to structured content.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}
