//! # mnemo-workflow
//!
//! The thin orchestration layer binding agents and humans to the diff
//! engine and block store.
//!
//! [`ApprovalWorkflow`] exposes the external surface: agents call
//! `propose_edit` with caller-facing strings (strategy, confidence), the
//! human UI calls `list_pending`, `approve`, `reject`, and the Markdown
//! read/save pair. The workflow adds no business rules beyond input
//! normalization and the [`ApprovalGate`] capability check before apply —
//! every structural decision lives in the engine and the store.

pub mod error;
pub mod gate;
pub mod view;
pub mod workflow;

pub use error::WorkflowError;
pub use gate::{AllowAll, ApprovalGate, OwnerOnly};
pub use view::DiffView;
pub use workflow::{ApprovalWorkflow, ProposeRequest};
