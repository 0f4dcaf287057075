//! # mnemo-convert
//!
//! Bidirectional transform between structured block content (TOML) and the
//! human-editable Markdown view.
//!
//! The contract is lossless structure, lossy type: converting content to
//! Markdown and back preserves the key set and nesting shape exactly, while
//! scalar subtypes may degrade (`true` renders as `Yes` and reads back as
//! text). A table never collapses into a stringified copy of itself.
//!
//! [`to_markdown`] is total — content that fails to parse is emitted raw
//! inside a fenced code block under an `error: invalid_format` frontmatter
//! flag so a human can still see and fix it by hand.

pub mod error;
pub mod frontmatter;
pub mod headings;
pub mod parse;
pub mod render;

pub use error::ConvertError;
pub use frontmatter::{MarkdownMeta, ERROR_INVALID_FORMAT};
pub use parse::from_markdown;
pub use render::to_markdown;
