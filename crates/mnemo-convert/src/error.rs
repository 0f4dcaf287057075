// error.rs — Error types for the Markdown converter.

use thiserror::Error;

use mnemo_schema::SchemaError;

/// Errors that can occur while parsing the Markdown view of a block.
///
/// Note the asymmetry: `to_markdown` never fails (unparseable content is
/// rendered through the `error: invalid_format` fallback); only the
/// Markdown-to-structured direction returns errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An opening `---` frontmatter fence with no closing fence.
    #[error("frontmatter block is not terminated")]
    UnterminatedFrontmatter,

    /// The frontmatter is present but not parseable as key: value pairs.
    #[error("invalid frontmatter: {0}")]
    Frontmatter(String),

    /// The reconstructed tree could not be serialized to structured text.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
