// view.rs — UI-facing projection of a pending diff.
//
// The UI never sees the PendingDiff record directly; it gets a DiffView
// with display-ready strings plus a plain-text render for terminals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use mnemo_diff::{Operation, PendingDiff};

/// Display projection of one pending diff.
#[derive(Debug, Clone, Serialize)]
pub struct DiffView {
    pub diff_id: Uuid,
    pub owner_id: String,
    pub block_label: String,
    pub field: Option<String>,
    pub operation: String,
    pub old_snippet: String,
    pub new_value: String,
    pub reasoning: String,
    pub confidence: String,
    pub proposer_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<PendingDiff> for DiffView {
    fn from(diff: PendingDiff) -> Self {
        Self {
            diff_id: diff.diff_id,
            owner_id: diff.owner_id,
            block_label: diff.block_label,
            field: diff.field,
            operation: diff.operation.to_string(),
            old_snippet: diff.old_snippet,
            new_value: diff.new_value,
            reasoning: diff.reasoning,
            confidence: diff.confidence.to_string(),
            proposer_id: diff.proposer_id,
            created_at: diff.created_at,
        }
    }
}

impl DiffView {
    /// One-line listing entry: glyph, target, reasoning.
    pub fn summary(&self) -> String {
        let glyph = match Operation::parse(&self.operation) {
            Some(Operation::Append) => "+",
            Some(Operation::Replace) => "~",
            Some(Operation::FullReplace) => "!",
            None => "?",
        };
        format!(
            "{} {} [{}] {} — {}",
            glyph,
            self.diff_id,
            self.confidence,
            self.target(),
            self.reasoning
        )
    }

    /// Full plain-text rendering for terminal review.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Diff: {}\nTarget: {}\nOperation: {}\nProposer: {}\nConfidence: {}\nCreated: {}\n\nReasoning:\n{}\n",
            self.diff_id,
            self.target(),
            self.operation,
            self.proposer_id,
            self.confidence,
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.reasoning,
        );
        if !self.old_snippet.is_empty() {
            out.push_str(&format!("\nReplaces:\n{}\n", indent(&self.old_snippet)));
        }
        out.push_str(&format!("\nWith:\n{}\n", indent(&self.new_value)));
        out
    }

    fn target(&self) -> String {
        match &self.field {
            Some(field) => format!("{}/{}.{}", self.owner_id, self.block_label, field),
            None => format!("{}/{}", self.owner_id, self.block_label),
        }
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_diff::Confidence;

    fn view() -> DiffView {
        PendingDiff::new(
            "u1".to_string(),
            "persona".to_string(),
            Some("notes".to_string()),
            Operation::Replace,
            "old line".to_string(),
            "new line".to_string(),
            "the old note was stale".to_string(),
            Confidence::High,
            "agent-1".to_string(),
        )
        .into()
    }

    #[test]
    fn summary_names_the_target_and_reasoning() {
        let summary = view().summary();
        assert!(summary.contains("u1/persona.notes"));
        assert!(summary.contains("the old note was stale"));
        assert!(summary.starts_with('~'));
    }

    #[test]
    fn render_shows_both_sides_of_the_edit() {
        let rendered = view().render();
        assert!(rendered.contains("Operation: replace"));
        assert!(rendered.contains("Replaces:\n  old line"));
        assert!(rendered.contains("With:\n  new line"));
        assert!(rendered.contains("Confidence: high"));
    }

    #[test]
    fn append_summary_uses_plus_glyph() {
        let mut v = view();
        v.operation = "append".to_string();
        assert!(v.summary().starts_with('+'));
    }
}
