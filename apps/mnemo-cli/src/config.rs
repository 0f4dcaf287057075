// config.rs — Optional CLI configuration from <root>/mnemo.toml.
//
// ```toml
// default_owner = "casey"
// proposer_id = "cli"
// ```

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Settings read from `<root>/mnemo.toml`. Everything is optional; the
/// file may be absent entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Owner id used when `--owner` is not given.
    #[serde(default)]
    pub default_owner: Option<String>,

    /// Proposer id stamped on diffs staged from this CLI.
    #[serde(default)]
    pub proposer_id: Option<String>,
}

impl CliConfig {
    /// Load config from the data root, or defaults if no file exists.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("mnemo.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config at {}", path.display()))
    }
}
