// gate.rs — The capability check run before any apply.
//
// Who may approve is a deployment decision, not an engine decision. The
// gate sits in front of DiffEngine::apply; implementations stay dumb —
// one predicate, no side effects.

use mnemo_diff::PendingDiff;

/// Capability check consulted before a diff is applied.
pub trait ApprovalGate: Send + Sync {
    /// Whether `actor` may approve the given diff.
    fn can_approve(&self, actor: &str, diff: &PendingDiff) -> bool;
}

/// Gate that approves everyone. For trusted single-user deployments and
/// tests.
pub struct AllowAll;

impl ApprovalGate for AllowAll {
    fn can_approve(&self, _actor: &str, _diff: &PendingDiff) -> bool {
        true
    }
}

/// Gate that only lets the block owner approve diffs against their own
/// blocks.
pub struct OwnerOnly;

impl ApprovalGate for OwnerOnly {
    fn can_approve(&self, actor: &str, diff: &PendingDiff) -> bool {
        actor == diff.owner_id
    }
}
