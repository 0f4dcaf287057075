// engine.rs — DiffEngine: propose, apply, reject, list.
//
// The engine never mutates storage directly — every apply runs through
// BlockStore::update, which holds the block's write lock for the whole
// read-modify-write cycle. Conflict detection is verbatim snippet
// matching: no fuzzy search, no "closest line" guessing. The proposer is
// responsible for quoting the real content.

use std::sync::Arc;

use uuid::Uuid;

use mnemo_schema::value::{parse_content, render_content, scalar_text};
use mnemo_schema::{FieldKind, FieldSpec};
use mnemo_store::{BlockStore, StoreError, UpdateError};

use crate::diff_store::DiffStore;
use crate::error::DiffError;
use crate::pending_diff::{Confidence, Operation, PendingDiff};

/// Input to [`DiffEngine::propose`] — everything the proposer supplies.
#[derive(Debug, Clone)]
pub struct ProposeSpec {
    pub owner_id: String,
    pub block_label: String,
    /// Target field; None means block-level.
    pub field: Option<String>,
    pub operation: Operation,
    /// Required for `replace`; ignored for `append`; superseded by a live
    /// snapshot for `full_replace`.
    pub old_snippet: Option<String>,
    pub new_value: String,
    pub reasoning: String,
    pub confidence: Confidence,
    pub proposer_id: String,
}

/// Creates, validates, and applies pending diffs against a [`BlockStore`].
pub struct DiffEngine {
    store: Arc<BlockStore>,
    diffs: Box<dyn DiffStore>,
}

impl DiffEngine {
    /// Create an engine over the given block store and diff store.
    pub fn new(store: Arc<BlockStore>, diffs: Box<dyn DiffStore>) -> Self {
        Self { store, diffs }
    }

    /// The block store this engine applies against.
    pub fn store(&self) -> &Arc<BlockStore> {
        &self.store
    }

    /// Stage a proposed edit as a pending diff.
    ///
    /// Validates the proposal shape but does not pre-apply it: the snippet
    /// precondition is checked at apply time against whatever the content
    /// is then.
    pub fn propose(&self, spec: ProposeSpec) -> Result<PendingDiff, DiffError> {
        if spec.reasoning.trim().is_empty() {
            return Err(DiffError::InvalidProposal(
                "reasoning must not be empty".to_string(),
            ));
        }

        let schema = self.store.schema_for(&spec.block_label)?;
        if let Some(field) = &spec.field {
            if !schema.fields.contains_key(field) {
                return Err(DiffError::InvalidProposal(format!(
                    "block `{}` declares no field `{}`",
                    spec.block_label, field
                )));
            }
        }

        let old_snippet = match spec.operation {
            Operation::Replace => {
                let snippet = spec.old_snippet.clone().unwrap_or_default();
                if snippet.is_empty() {
                    return Err(DiffError::InvalidProposal(
                        "replace requires the exact current snippet being targeted".to_string(),
                    ));
                }
                let current = self.store.read(&spec.owner_id, &spec.block_label)?;
                if !current.as_deref().is_some_and(|c| c.contains(&snippet)) {
                    tracing::warn!(
                        "replace snippet from {} not present in current content of {}/{} at proposal time",
                        spec.proposer_id,
                        spec.owner_id,
                        spec.block_label
                    );
                }
                snippet
            }
            Operation::Append => {
                if let Some(field) = &spec.field {
                    self.check_table_fragment(schema.fields.get(field), field, &spec.new_value)?;
                }
                String::new()
            }
            Operation::FullReplace => self
                .store
                .read(&spec.owner_id, &spec.block_label)?
                .unwrap_or_default(),
        };

        let diff = PendingDiff::new(
            spec.owner_id,
            spec.block_label,
            spec.field,
            spec.operation,
            old_snippet,
            spec.new_value,
            spec.reasoning,
            spec.confidence,
            spec.proposer_id,
        );
        self.diffs.insert(&diff)?;
        tracing::info!(
            "staged {} diff {} for {}/{} from {}",
            diff.operation,
            diff.diff_id,
            diff.owner_id,
            diff.block_label,
            diff.proposer_id
        );
        Ok(diff)
    }

    /// Apply a pending diff to its block and discard the record.
    ///
    /// Re-reads current content under the block's write lock — never a
    /// cached copy. On any failure the block and the pending diff are both
    /// left untouched.
    pub fn apply(&self, diff_id: Uuid) -> Result<(), DiffError> {
        let diff = self
            .diffs
            .get(diff_id)?
            .ok_or(DiffError::NotFound(diff_id))?;

        let field_spec = diff
            .field
            .as_ref()
            .and_then(|field| self.store.schema_for(&diff.block_label).ok()?.fields.get(field))
            .cloned();

        self.store
            .update(&diff.owner_id, &diff.block_label, |current| {
                apply_operation(&diff, field_spec.as_ref(), current)
            })
            .map_err(|err| match err {
                UpdateError::Store(e) => DiffError::Store(e),
                UpdateError::Apply(e) => e,
            })?;

        self.diffs.remove(diff_id)?;
        tracing::info!(
            "applied {} diff {} to {}/{}",
            diff.operation,
            diff_id,
            diff.owner_id,
            diff.block_label
        );
        Ok(())
    }

    /// Discard a pending diff with no effect on block content.
    pub fn reject(&self, diff_id: Uuid) -> Result<(), DiffError> {
        if self.diffs.remove(diff_id)? {
            tracing::info!("rejected pending diff {}", diff_id);
            Ok(())
        } else {
            Err(DiffError::NotFound(diff_id))
        }
    }

    /// Get a pending diff by id.
    pub fn get(&self, diff_id: Uuid) -> Result<Option<PendingDiff>, DiffError> {
        self.diffs.get(diff_id)
    }

    /// All diffs pending for a block, oldest first.
    pub fn list(&self, owner_id: &str, label: &str) -> Result<Vec<PendingDiff>, DiffError> {
        self.diffs.list_for_block(owner_id, label)
    }

    fn check_table_fragment(
        &self,
        spec: Option<&FieldSpec>,
        field: &str,
        new_value: &str,
    ) -> Result<(), DiffError> {
        if spec.is_some_and(|s| s.kind == FieldKind::Table)
            && new_value.parse::<toml::Table>().is_err()
        {
            return Err(DiffError::InvalidProposal(format!(
                "append to table field `{field}` requires a `key = value` fragment"
            )));
        }
        Ok(())
    }
}

/// Compute the new block content for one diff against current content.
fn apply_operation(
    diff: &PendingDiff,
    field_spec: Option<&FieldSpec>,
    current: Option<&str>,
) -> Result<String, DiffError> {
    match diff.operation {
        Operation::Replace => {
            let current = current.ok_or(DiffError::SnippetNotFound)?;
            if !current.contains(&diff.old_snippet) {
                return Err(DiffError::SnippetNotFound);
            }
            // First occurrence only — everything else stays byte-identical.
            Ok(current.replacen(&diff.old_snippet, &diff.new_value, 1))
        }
        Operation::Append => match (&diff.field, field_spec) {
            (Some(field), Some(spec)) => append_field(current, field, spec, &diff.new_value),
            (Some(field), None) => Err(DiffError::InvalidProposal(format!(
                "block `{}` declares no field `{}`",
                diff.block_label, field
            ))),
            (None, _) => Ok(join_blocks(current, &diff.new_value)),
        },
        Operation::FullReplace => {
            let live = current.unwrap_or("");
            if live != diff.old_snippet {
                tracing::warn!(
                    "diff {}: live content of {}/{} differs from the proposal snapshot, replacing anyway",
                    diff.diff_id,
                    diff.owner_id,
                    diff.block_label
                );
            }
            Ok(diff.new_value.clone())
        }
    }
}

/// Block-level append: newline-joined concatenation.
fn join_blocks(current: Option<&str>, new_value: &str) -> String {
    match current {
        None => new_value.to_string(),
        Some(text) if text.is_empty() => new_value.to_string(),
        Some(text) => {
            let mut joined = text.trim_end_matches('\n').to_string();
            joined.push('\n');
            joined.push_str(new_value);
            joined
        }
    }
}

/// Field-level append, directed by the field's declared kind.
fn append_field(
    current: Option<&str>,
    field: &str,
    spec: &FieldSpec,
    new_value: &str,
) -> Result<String, DiffError> {
    let mut table = match current {
        Some(text) => parse_content(text).map_err(StoreError::from)?,
        None => toml::Table::new(),
    };

    let merged = match spec.kind {
        FieldKind::String => {
            let joined = match table.get(field) {
                Some(existing) => {
                    let text = scalar_text(existing);
                    if text.is_empty() {
                        new_value.to_string()
                    } else {
                        format!("{text}\n{new_value}")
                    }
                }
                None => new_value.to_string(),
            };
            toml::Value::String(joined)
        }
        FieldKind::List => {
            let mut items = table
                .get(field)
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            items.push(toml::Value::String(new_value.to_string()));
            toml::Value::Array(items)
        }
        FieldKind::Table => {
            // Policy: the appended value is a TOML fragment whose keys
            // merge into the table, replacing colliding keys.
            let fragment = new_value.parse::<toml::Table>().map_err(|_| {
                DiffError::InvalidProposal(format!(
                    "append to table field `{field}` requires a `key = value` fragment"
                ))
            })?;
            let mut existing = table
                .get(field)
                .and_then(|v| v.as_table())
                .cloned()
                .unwrap_or_default();
            for (key, value) in fragment {
                existing.insert(key, value);
            }
            toml::Value::Table(existing)
        }
    };

    table.insert(field.to_string(), merged);
    render_content(&table).map_err(|e| DiffError::Store(e.into()))
}
