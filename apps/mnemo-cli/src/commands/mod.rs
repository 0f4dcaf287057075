// commands/mod.rs — Shared command context: stores wired from the data root.

pub mod block;
pub mod review;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};

use mnemo_diff::{DiffEngine, JsonDiffStore};
use mnemo_schema::SchemaRegistry;
use mnemo_store::{BlockStore, FsBackend};
use mnemo_workflow::{ApprovalWorkflow, OwnerOnly};

use crate::config::CliConfig;

/// Everything a command needs: the workflow plus resolved identities.
pub struct Context {
    pub workflow: ApprovalWorkflow,
    /// The acting user (owner and approver).
    pub owner: String,
    /// Proposer id stamped on diffs staged from this CLI.
    pub proposer: String,
}

impl Context {
    /// Wire up the workflow from the data root directory.
    ///
    /// Requires `<root>/schemas.toml`. Creates `blocks/` and `diffs/`
    /// on demand.
    pub fn load(root: &Path, owner_flag: Option<String>) -> Result<Self> {
        let config = CliConfig::load(root)?;

        let Some(owner) = owner_flag.or(config.default_owner) else {
            bail!("no owner: pass --owner or set default_owner in mnemo.toml");
        };
        let proposer = config.proposer_id.unwrap_or_else(|| "cli".to_string());

        let schema_path = root.join("schemas.toml");
        let schema_text = fs::read_to_string(&schema_path)
            .with_context(|| format!("reading schemas at {}", schema_path.display()))?;
        let mut schemas = SchemaRegistry::new();
        schemas
            .load_toml_str(&schema_text)
            .with_context(|| format!("parsing schemas at {}", schema_path.display()))?;

        let backend = FsBackend::new(root.join("blocks"))?;
        let store = Arc::new(BlockStore::new(Box::new(backend), schemas));
        let diffs = JsonDiffStore::new(root.join("diffs"))?;
        let engine = DiffEngine::new(store, Box::new(diffs));
        let workflow = ApprovalWorkflow::new(engine, Box::new(OwnerOnly));

        Ok(Self {
            workflow,
            owner,
            proposer,
        })
    }
}
