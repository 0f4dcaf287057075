// pending_diff.rs — The staged mutation record awaiting human review.
//
// A PendingDiff carries everything a reviewer needs: what block, which
// operation, the exact snippet being replaced, the replacement text, and
// the proposer's reasoning and confidence. The snippet is deliberately a
// required, minimal field — storing "the whole file" as the old value is
// the failure mode this model exists to prevent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// What a proposed edit does to its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Add new content to the end of the addressed field or block.
    Append,
    /// Substitute the first occurrence of `old_snippet` with `new_value`.
    Replace,
    /// Substitute the entire block content with `new_value`.
    FullReplace,
}

impl Operation {
    /// Parse a caller-supplied strategy string.
    pub fn parse(strategy: &str) -> Option<Self> {
        match strategy {
            "append" => Some(Operation::Append),
            "replace" => Some(Operation::Replace),
            "full_replace" => Some(Operation::FullReplace),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Append => write!(f, "append"),
            Operation::Replace => write!(f, "replace"),
            Operation::FullReplace => write!(f, "full_replace"),
        }
    }
}

/// Proposer-supplied certainty label. Informational only — the engine
/// never branches on it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// Parse a caller-supplied confidence string.
    pub fn parse(confidence: &str) -> Option<Self> {
        match confidence {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// A proposed mutation, not yet applied.
///
/// Lifecycle: created by `DiffEngine::propose`; terminated by exactly one
/// of apply (merged into the block, record removed) or reject (record
/// removed, block unchanged).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDiff {
    /// Unique identifier for this diff.
    pub diff_id: Uuid,

    /// The user whose block this targets.
    pub owner_id: String,

    /// The targeted block label.
    pub block_label: String,

    /// The targeted field. Absent means block-level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// What the edit does.
    pub operation: Operation,

    /// The exact substring being replaced. Empty for `append`; the whole
    /// block content captured at proposal time for `full_replace`.
    pub old_snippet: String,

    /// The text to insert or substitute.
    pub new_value: String,

    /// Why the proposer wants this change. Required, non-empty.
    pub reasoning: String,

    /// Proposer-supplied certainty label.
    pub confidence: Confidence,

    /// The agent that proposed this edit.
    pub proposer_id: String,

    /// When this diff was created.
    pub created_at: DateTime<Utc>,

    /// SHA-256 hash of the edit payload for integrity verification.
    pub content_hash: String,
}

impl PendingDiff {
    /// Create a new pending diff with automatically computed content hash.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        block_label: String,
        field: Option<String>,
        operation: Operation,
        old_snippet: String,
        new_value: String,
        reasoning: String,
        confidence: Confidence,
        proposer_id: String,
    ) -> Self {
        let content_hash = compute_content_hash(operation, &field, &old_snippet, &new_value);
        Self {
            diff_id: Uuid::new_v4(),
            owner_id,
            block_label,
            field,
            operation,
            old_snippet,
            new_value,
            reasoning,
            confidence,
            proposer_id,
            created_at: Utc::now(),
            content_hash,
        }
    }

    /// Verify the content hash matches the edit payload.
    pub fn verify_hash(&self) -> bool {
        let expected = compute_content_hash(
            self.operation,
            &self.field,
            &self.old_snippet,
            &self.new_value,
        );
        self.content_hash == expected
    }
}

/// SHA-256 over the canonical JSON encoding of the edit payload.
fn compute_content_hash(
    operation: Operation,
    field: &Option<String>,
    old_snippet: &str,
    new_value: &str,
) -> String {
    let payload = serde_json::json!({
        "operation": operation,
        "field": field,
        "old_snippet": old_snippet,
        "new_value": new_value,
    })
    .to_string();
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}
