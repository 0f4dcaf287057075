// frontmatter.rs — YAML frontmatter emission and parsing.
//
// Every Markdown view starts with a frontmatter block carrying at least the
// block label. The invalid_format flag marks content that failed to parse
// and is being shown raw for manual repair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Frontmatter flag value marking content that failed to parse.
pub const ERROR_INVALID_FORMAT: &str = "invalid_format";

/// Parsed frontmatter of a Markdown block view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownMeta {
    /// The block label this view belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,

    /// Error flag (`invalid_format`) when the source content was unparseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Any additional key: value pairs a human or tool added.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl MarkdownMeta {
    /// Frontmatter for a normally rendered block.
    pub fn for_block(label: &str) -> Self {
        Self {
            block: Some(label.to_string()),
            ..Self::default()
        }
    }

    /// Frontmatter for the raw fallback view of unparseable content.
    pub fn invalid_format(label: &str) -> Self {
        Self {
            block: Some(label.to_string()),
            error: Some(ERROR_INVALID_FORMAT.to_string()),
            ..Self::default()
        }
    }

    /// True if this view carries the invalid_format flag.
    pub fn is_invalid_format(&self) -> bool {
        self.error.as_deref() == Some(ERROR_INVALID_FORMAT)
    }
}

/// Emit a frontmatter block, `---` fenced.
pub fn render(meta: &MarkdownMeta) -> String {
    let mut out = String::from("---\n");
    if let Some(block) = &meta.block {
        out.push_str(&format!("block: {block}\n"));
    }
    if let Some(error) = &meta.error {
        out.push_str(&format!("error: {error}\n"));
    }
    for (key, value) in &meta.extra {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str("---\n");
    out
}

/// Split a Markdown document into frontmatter and body.
///
/// A document without a leading `---` fence gets default (empty) metadata.
pub fn split(markdown: &str) -> Result<(MarkdownMeta, &str), ConvertError> {
    let rest = match markdown.strip_prefix("---") {
        Some(rest) if rest.starts_with('\n') || rest.starts_with("\r\n") => rest,
        _ => return Ok((MarkdownMeta::default(), markdown)),
    };

    // Find the closing fence on its own line.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" && offset > 0 {
            let inner = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let meta = parse_meta(inner)?;
            return Ok((meta, body));
        }
        offset += line.len();
    }
    Err(ConvertError::UnterminatedFrontmatter)
}

fn parse_meta(inner: &str) -> Result<MarkdownMeta, ConvertError> {
    if inner.trim().is_empty() {
        return Ok(MarkdownMeta::default());
    }
    serde_yaml::from_str(inner).map_err(|e| ConvertError::Frontmatter(e.to_string()))
}
