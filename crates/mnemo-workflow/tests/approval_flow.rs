// approval_flow.rs — End-to-end workflow over filesystem-backed stores.
//
// Exercises the full lifecycle the way a deployment runs it: schemas from
// a schema file, blocks on disk, diffs as JSON records, agents proposing
// concurrently with a human approving.

use std::sync::Arc;

use mnemo_diff::{DiffEngine, JsonDiffStore};
use mnemo_schema::SchemaRegistry;
use mnemo_store::{BlockStore, FsBackend};
use mnemo_workflow::{ApprovalWorkflow, OwnerOnly, ProposeRequest};
use tempfile::TempDir;

const SCHEMAS: &str = r#"
[persona.fields.name]
kind = "string"
default = "unknown"

[persona.fields.hobbies]
kind = "list"

[persona.fields.preferences]
kind = "table"

[persona.fields.preferences.fields.diet]
kind = "string"
"#;

fn workflow(root: &TempDir) -> ApprovalWorkflow {
    let mut schemas = SchemaRegistry::new();
    schemas.load_toml_str(SCHEMAS).unwrap();

    let backend = FsBackend::new(root.path().join("blocks")).unwrap();
    let store = Arc::new(BlockStore::new(Box::new(backend), schemas));
    let diffs = JsonDiffStore::new(root.path().join("diffs")).unwrap();
    let engine = DiffEngine::new(store, Box::new(diffs));
    ApprovalWorkflow::new(engine, Box::new(OwnerOnly))
}

fn propose(strategy: &str, content: &str, old: Option<&str>) -> ProposeRequest {
    ProposeRequest {
        owner_id: "casey".to_string(),
        block: "persona".to_string(),
        field: None,
        content: content.to_string(),
        strategy: strategy.to_string(),
        reasoning: "observed in conversation".to_string(),
        confidence: Some("high".to_string()),
        old_content: old.map(str::to_string),
        proposer_id: "tutor-agent".to_string(),
    }
}

#[test]
fn full_lifecycle_propose_review_approve() {
    let root = TempDir::new().unwrap();
    let wf = workflow(&root);

    // Block starts from schema defaults.
    assert!(wf.init_block("casey", "persona").unwrap());
    let markdown = wf.get_block_markdown("casey", "persona").unwrap();
    assert!(markdown.contains("## Name"));
    assert!(markdown.contains("unknown"));

    // An agent proposes a correction; nothing changes until approval.
    let diff_id = wf
        .propose_edit(propose(
            "replace",
            "name = \"Casey\"",
            Some("name = \"unknown\""),
        ))
        .unwrap();

    let content = wf.store().read("casey", "persona").unwrap().unwrap();
    assert!(content.contains("unknown"));

    let pending = wf.list_pending("casey", "persona").unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].render().contains("tutor-agent"));

    // The owner approves; the diff merges and leaves the queue.
    wf.approve("casey", diff_id).unwrap();
    let content = wf.store().read("casey", "persona").unwrap().unwrap();
    assert!(content.contains("name = \"Casey\""));
    assert!(wf.list_pending("casey", "persona").unwrap().is_empty());
}

#[test]
fn conflicting_proposals_fail_cleanly_after_first_merge() {
    let root = TempDir::new().unwrap();
    let wf = workflow(&root);
    wf.store()
        .write("casey", "persona", "name = \"unknown\"")
        .unwrap();

    // Two agents target the same snippet without coordinating.
    let first = wf
        .propose_edit(propose(
            "replace",
            "name = \"Casey\"",
            Some("name = \"unknown\""),
        ))
        .unwrap();
    let second = wf
        .propose_edit(propose(
            "replace",
            "name = \"K.C.\"",
            Some("name = \"unknown\""),
        ))
        .unwrap();

    wf.approve("casey", first).unwrap();

    // The second apply must conflict, not clobber the first merge.
    let err = wf.approve("casey", second).unwrap_err();
    assert!(err.to_string().contains("not found"));

    let content = wf.store().read("casey", "persona").unwrap().unwrap();
    assert!(content.contains("Casey"));
    assert!(!content.contains("K.C."));

    // The conflicted diff is still pending — the human decides its fate.
    assert_eq!(wf.list_pending("casey", "persona").unwrap().len(), 1);
    wf.reject(second).unwrap();
    assert!(wf.list_pending("casey", "persona").unwrap().is_empty());
}

#[test]
fn state_survives_process_restart() {
    let root = TempDir::new().unwrap();

    let diff_id = {
        let wf = workflow(&root);
        wf.init_block("casey", "persona").unwrap();
        wf.propose_edit(propose("append", "hobbies = [\"chess\"]", None))
            .unwrap()
    };

    // A fresh workflow over the same root sees the block and the diff.
    let wf = workflow(&root);
    let pending = wf.list_pending("casey", "persona").unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].diff_id, diff_id);

    wf.approve("casey", diff_id).unwrap();
    let content = wf.store().read("casey", "persona").unwrap().unwrap();
    assert!(content.contains("chess"));
}

#[test]
fn human_markdown_edit_coexists_with_pending_diffs() {
    let root = TempDir::new().unwrap();
    let wf = workflow(&root);
    wf.store()
        .write("casey", "persona", "name = \"Casey\"\nhobbies = [\"chess\"]")
        .unwrap();

    // Agent proposes against the hobbies line.
    let diff_id = wf
        .propose_edit(propose(
            "replace",
            "hobbies = [\"chess\", \"climbing\"]",
            Some("hobbies = [\"chess\"]"),
        ))
        .unwrap();

    // Meanwhile the human edits the name through Markdown. The hobbies
    // line is untouched, so the pending diff still applies.
    let markdown = wf.get_block_markdown("casey", "persona").unwrap();
    let edited = markdown.replace("Casey", "K.C.");
    wf.save_block_markdown("casey", "persona", &edited).unwrap();

    wf.approve("casey", diff_id).unwrap();

    let content = wf.store().read("casey", "persona").unwrap().unwrap();
    assert!(content.contains("K.C."));
    assert!(content.contains("climbing"));
}
