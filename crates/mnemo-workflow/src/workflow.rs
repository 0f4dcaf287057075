// workflow.rs — ApprovalWorkflow: the external call surface.
//
// Maps caller-facing strings onto engine types, runs the approval gate
// before apply, and routes Markdown views through the converter with the
// BlockStore as the authority on both sides. No business rules here.

use std::sync::Arc;

use uuid::Uuid;

use mnemo_convert::{from_markdown, to_markdown};
use mnemo_diff::{Confidence, DiffEngine, DiffError, Operation, ProposeSpec};
use mnemo_store::BlockStore;

use crate::error::WorkflowError;
use crate::gate::ApprovalGate;
use crate::view::DiffView;

/// A propose-edit call as it arrives from the agent runtime.
#[derive(Debug, Clone)]
pub struct ProposeRequest {
    pub owner_id: String,
    pub block: String,
    /// Target field; None means block-level.
    pub field: Option<String>,
    /// The new content to insert or substitute.
    pub content: String,
    /// "append", "replace", or "full_replace".
    pub strategy: String,
    pub reasoning: String,
    /// "low", "medium", or "high". Defaults to medium.
    pub confidence: Option<String>,
    /// The exact current substring being replaced. Required by the engine
    /// for replace; the runtime supplies it, the core never reconstructs it.
    pub old_content: Option<String>,
    pub proposer_id: String,
}

/// The propose / list / approve / reject surface exposed to agents and
/// the human UI.
pub struct ApprovalWorkflow {
    engine: DiffEngine,
    gate: Box<dyn ApprovalGate>,
}

impl ApprovalWorkflow {
    /// Create a workflow over an engine and an approval gate.
    pub fn new(engine: DiffEngine, gate: Box<dyn ApprovalGate>) -> Self {
        Self { engine, gate }
    }

    /// The underlying block store.
    pub fn store(&self) -> &Arc<BlockStore> {
        self.engine.store()
    }

    /// Initialize a block from its schema defaults. Returns true if it
    /// was created, false if it already existed.
    pub fn init_block(&self, owner_id: &str, label: &str) -> Result<bool, WorkflowError> {
        Ok(self.store().init(owner_id, label)?)
    }

    /// Stage a proposed edit. Returns the pending diff id.
    pub fn propose_edit(&self, request: ProposeRequest) -> Result<Uuid, WorkflowError> {
        let operation = Operation::parse(&request.strategy)
            .ok_or_else(|| WorkflowError::UnknownStrategy(request.strategy.clone()))?;
        let confidence = match &request.confidence {
            None => Confidence::default(),
            Some(text) => Confidence::parse(text)
                .ok_or_else(|| WorkflowError::UnknownConfidence(text.clone()))?,
        };

        let diff = self.engine.propose(ProposeSpec {
            owner_id: request.owner_id,
            block_label: request.block,
            field: request.field,
            operation,
            old_snippet: request.old_content,
            new_value: request.content,
            reasoning: request.reasoning,
            confidence,
            proposer_id: request.proposer_id,
        })?;
        Ok(diff.diff_id)
    }

    /// Approve a pending diff: capability check, then apply.
    pub fn approve(&self, actor: &str, diff_id: Uuid) -> Result<(), WorkflowError> {
        let diff = self
            .engine
            .get(diff_id)?
            .ok_or(DiffError::NotFound(diff_id))?;

        if !self.gate.can_approve(actor, &diff) {
            tracing::warn!("{} denied approval of diff {}", actor, diff_id);
            return Err(WorkflowError::NotAuthorized {
                actor: actor.to_string(),
            });
        }

        self.engine.apply(diff_id)?;
        Ok(())
    }

    /// Reject a pending diff. Block content is untouched.
    pub fn reject(&self, diff_id: Uuid) -> Result<(), WorkflowError> {
        self.engine.reject(diff_id)?;
        Ok(())
    }

    /// All diffs pending for a block, oldest first, as display views.
    pub fn list_pending(&self, owner_id: &str, label: &str) -> Result<Vec<DiffView>, WorkflowError> {
        let diffs = self.engine.list(owner_id, label)?;
        Ok(diffs.into_iter().map(DiffView::from).collect())
    }

    /// One pending diff as a display view.
    pub fn get_pending(&self, diff_id: Uuid) -> Result<Option<DiffView>, WorkflowError> {
        Ok(self.engine.get(diff_id)?.map(DiffView::from))
    }

    /// The Markdown view of a block's current content.
    pub fn get_block_markdown(&self, owner_id: &str, label: &str) -> Result<String, WorkflowError> {
        let content =
            self.store()
                .read(owner_id, label)?
                .ok_or_else(|| WorkflowError::BlockNotFound {
                    owner: owner_id.to_string(),
                    label: label.to_string(),
                })?;
        Ok(to_markdown(&content, label))
    }

    /// Save a human-edited Markdown view back as block content.
    ///
    /// The store validates the result before committing; a failing save
    /// leaves the block untouched.
    pub fn save_block_markdown(
        &self,
        owner_id: &str,
        label: &str,
        markdown: &str,
    ) -> Result<(), WorkflowError> {
        let (content, meta) = from_markdown(markdown)?;
        if let Some(block) = &meta.block {
            if block != label {
                tracing::warn!(
                    "markdown frontmatter names block `{}` but is being saved to `{}`",
                    block,
                    label
                );
            }
        }
        self.store().write(owner_id, label, &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{AllowAll, OwnerOnly};
    use mnemo_diff::MemoryDiffStore;
    use mnemo_schema::{BlockSchema, FieldSpec, SchemaRegistry};
    use mnemo_store::MemoryBackend;
    use std::collections::BTreeMap;

    fn test_workflow(gate: Box<dyn ApprovalGate>) -> ApprovalWorkflow {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldSpec::string());
        fields.insert("notes".to_string(), FieldSpec::string());

        let mut schemas = SchemaRegistry::new();
        schemas.register(BlockSchema::new("persona", fields));

        let store = Arc::new(BlockStore::new(Box::new(MemoryBackend::new()), schemas));
        let engine = DiffEngine::new(store, Box::new(MemoryDiffStore::new()));
        ApprovalWorkflow::new(engine, gate)
    }

    fn request(strategy: &str) -> ProposeRequest {
        ProposeRequest {
            owner_id: "u1".to_string(),
            block: "persona".to_string(),
            field: None,
            content: "name = \"Bob\"".to_string(),
            strategy: strategy.to_string(),
            reasoning: "user corrected their name".to_string(),
            confidence: None,
            old_content: Some("name = \"Alice\"".to_string()),
            proposer_id: "agent-1".to_string(),
        }
    }

    #[test]
    fn propose_approve_mutates_block() {
        let wf = test_workflow(Box::new(AllowAll));
        wf.store().write("u1", "persona", "name = \"Alice\"").unwrap();

        let diff_id = wf.propose_edit(request("replace")).unwrap();
        wf.approve("u1", diff_id).unwrap();

        let content = wf.store().read("u1", "persona").unwrap().unwrap();
        assert_eq!(content, "name = \"Bob\"");
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let wf = test_workflow(Box::new(AllowAll));
        let err = wf.propose_edit(request("rewrite")).unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownStrategy(_)));
    }

    #[test]
    fn unknown_confidence_is_rejected() {
        let wf = test_workflow(Box::new(AllowAll));
        let err = wf
            .propose_edit(ProposeRequest {
                confidence: Some("certain".to_string()),
                ..request("replace")
            })
            .unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownConfidence(_)));
    }

    #[test]
    fn gate_blocks_unauthorized_approver() {
        let wf = test_workflow(Box::new(OwnerOnly));
        wf.store().write("u1", "persona", "name = \"Alice\"").unwrap();

        let diff_id = wf.propose_edit(request("replace")).unwrap();

        let err = wf.approve("u2", diff_id).unwrap_err();
        assert!(matches!(err, WorkflowError::NotAuthorized { .. }));

        // Nothing applied; diff still pending for the rightful owner.
        let content = wf.store().read("u1", "persona").unwrap().unwrap();
        assert_eq!(content, "name = \"Alice\"");
        wf.approve("u1", diff_id).unwrap();
    }

    #[test]
    fn list_pending_returns_views() {
        let wf = test_workflow(Box::new(AllowAll));
        wf.store().write("u1", "persona", "name = \"Alice\"").unwrap();

        let diff_id = wf.propose_edit(request("replace")).unwrap();
        let pending = wf.list_pending("u1", "persona").unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].diff_id, diff_id);
        assert_eq!(pending[0].operation, "replace");
        assert_eq!(pending[0].confidence, "medium");
    }

    #[test]
    fn markdown_round_trip_through_the_workflow() {
        let wf = test_workflow(Box::new(AllowAll));
        wf.store()
            .write("u1", "persona", "name = \"Alice\"\nnotes = \"prefers mornings\"")
            .unwrap();

        let markdown = wf.get_block_markdown("u1", "persona").unwrap();
        assert!(markdown.contains("## Name"));

        let edited = markdown.replace("prefers mornings", "prefers evenings");
        wf.save_block_markdown("u1", "persona", &edited).unwrap();

        let content = wf.store().read("u1", "persona").unwrap().unwrap();
        assert!(content.contains("prefers evenings"));
        assert!(content.contains("name = \"Alice\""));
    }

    #[test]
    fn markdown_of_uninitialized_block_is_not_found() {
        let wf = test_workflow(Box::new(AllowAll));
        let err = wf.get_block_markdown("u1", "persona").unwrap_err();
        assert!(matches!(err, WorkflowError::BlockNotFound { .. }));
    }

    #[test]
    fn saving_markdown_with_undeclared_field_fails_cleanly() {
        let wf = test_workflow(Box::new(AllowAll));
        wf.store().write("u1", "persona", "name = \"Alice\"").unwrap();

        let markdown = "---\nblock: persona\n---\n\n## Nickname\n\nAl\n";
        let err = wf.save_block_markdown("u1", "persona", markdown).unwrap_err();
        assert!(matches!(err, WorkflowError::Store(_)));

        let content = wf.store().read("u1", "persona").unwrap().unwrap();
        assert_eq!(content, "name = \"Alice\"");
    }
}
