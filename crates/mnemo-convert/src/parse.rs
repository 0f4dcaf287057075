// parse.rs — Markdown view → structured content.
//
// Walks headings in document order with an explicit frame stack. A level-2
// heading opens a top-level key; each deeper heading opens a sub-key and
// forces its parent to become a table. Scalar text already accumulated by
// a parent is demoted under a `_value` sentinel key, never discarded.

use std::collections::BTreeMap;

use mnemo_schema::value::render_content;
use mnemo_schema::FieldValue;

use crate::error::ConvertError;
use crate::frontmatter::{self, MarkdownMeta};
use crate::headings::{parse_heading, snake_case};

/// Sentinel key for scalar text demoted when its section gained sub-keys.
pub const VALUE_SENTINEL: &str = "_value";

/// Parse a Markdown view back into structured block content.
///
/// Returns the serialized structured text plus the parsed frontmatter.
/// A view carrying the `invalid_format` flag is returned as its raw fenced
/// text, so hand-fixed broken content round-trips without loss.
pub fn from_markdown(markdown: &str) -> Result<(String, MarkdownMeta), ConvertError> {
    let (meta, body) = frontmatter::split(markdown)?;

    if meta.is_invalid_format() {
        return Ok((extract_fenced(body), meta));
    }

    let mut root: BTreeMap<String, FieldValue> = BTreeMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            // Fenced text inside a section is kept verbatim as scalar lines.
            in_fence = !in_fence;
            continue;
        }

        if !in_fence {
            if let Some((level, title)) = parse_heading(line) {
                if level < 2 {
                    // A document title — not a key.
                    continue;
                }
                close_frames(&mut stack, &mut root, level);
                if let Some(parent) = stack.last_mut() {
                    parent.demote_pending();
                }
                stack.push(Frame::new(snake_case(title), level));
                continue;
            }
        }

        let Some(frame) = stack.last_mut() else {
            // Text before the first section has no key to live under.
            continue;
        };

        if let Some(item) = line.strip_prefix("- ") {
            frame.bullets.push(item.trim().to_string());
        } else {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                frame.lines.push(trimmed.to_string());
            }
        }
    }

    close_frames(&mut stack, &mut root, 2);

    let mut table = toml::Table::new();
    for (key, value) in root {
        table.insert(key, value.to_toml());
    }
    let content = render_content(&table)?;
    Ok((content, meta))
}

/// One open heading section being accumulated.
struct Frame {
    key: String,
    level: usize,
    lines: Vec<String>,
    bullets: Vec<String>,
    children: BTreeMap<String, FieldValue>,
}

impl Frame {
    fn new(key: String, level: usize) -> Self {
        Self {
            key,
            level,
            lines: Vec::new(),
            bullets: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// The value this section accumulated so far, if any.
    fn take_pending(&mut self) -> Option<FieldValue> {
        let lines = std::mem::take(&mut self.lines);
        let bullets = std::mem::take(&mut self.bullets);
        match (lines.is_empty(), bullets.is_empty()) {
            (true, true) => None,
            (true, false) => Some(FieldValue::List(bullets)),
            (false, true) => Some(scalar_from_lines(lines)),
            (false, false) => {
                // Mixed prose and bullets: the bullets fix the shape as a
                // list and the prose joins in as the leading item.
                let mut items = vec![lines.join("\n")];
                items.extend(bullets);
                Some(FieldValue::List(items))
            }
        }
    }

    /// Move accumulated scalar content under the sentinel key — called when
    /// this section gains a child heading.
    fn demote_pending(&mut self) {
        if let Some(pending) = self.take_pending() {
            self.children.insert(VALUE_SENTINEL.to_string(), pending);
        }
    }

    /// Close this section into its final value.
    fn finish(mut self) -> FieldValue {
        match self.take_pending() {
            Some(pending) if self.children.is_empty() => pending,
            Some(pending) => {
                self.children.insert(VALUE_SENTINEL.to_string(), pending);
                FieldValue::Table(self.children)
            }
            None if self.children.is_empty() => FieldValue::Scalar(String::new()),
            None => FieldValue::Table(self.children),
        }
    }
}

fn scalar_from_lines(lines: Vec<String>) -> FieldValue {
    let joined = lines.join("\n");
    if joined == "*(not set)*" {
        FieldValue::Scalar(String::new())
    } else {
        FieldValue::Scalar(joined)
    }
}

/// Pop and commit every frame at `level` or deeper.
fn close_frames(stack: &mut Vec<Frame>, root: &mut BTreeMap<String, FieldValue>, level: usize) {
    while stack.last().is_some_and(|frame| frame.level >= level) {
        let Some(frame) = stack.pop() else {
            break;
        };
        let key = frame.key.clone();
        let value = frame.finish();
        match stack.last_mut() {
            Some(parent) => {
                parent.children.insert(key, value);
            }
            None => {
                root.insert(key, value);
            }
        }
    }
}

/// Pull the raw text out of the first fenced code block, or the whole body
/// when no fence is present.
fn extract_fenced(body: &str) -> String {
    let mut inside = false;
    let mut raw = String::new();
    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            if inside {
                return raw;
            }
            inside = true;
            continue;
        }
        if inside {
            raw.push_str(line);
            raw.push('\n');
        }
    }
    if inside {
        raw
    } else {
        body.trim().to_string()
    }
}
