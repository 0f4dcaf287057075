// render.rs — Structured content → Markdown view.
//
// Each top-level key becomes a level-2 heading; every level of table
// nesting goes one heading level deeper. Scalars become paragraphs,
// booleans render Yes/No, lists become bullets.

use mnemo_schema::value::parse_content;

use crate::frontmatter::{self, MarkdownMeta};
use crate::headings::{heading, title_case};

/// Render structured block content as Markdown.
///
/// Never fails: content that does not parse is emitted raw inside a fenced
/// code block under an `error: invalid_format` frontmatter flag, so the
/// human always has a visible, editable artifact.
pub fn to_markdown(content: &str, block_label: &str) -> String {
    match parse_content(content) {
        Ok(table) => {
            let mut out = frontmatter::render(&MarkdownMeta::for_block(block_label));
            out.push('\n');
            for (key, value) in &table {
                render_section(&mut out, 2, key, value);
            }
            trim_to_single_newline(out)
        }
        Err(err) => {
            tracing::warn!("block {}: rendering unparseable content raw: {}", block_label, err);
            let mut out = frontmatter::render(&MarkdownMeta::invalid_format(block_label));
            out.push('\n');
            out.push_str("```\n");
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
            out
        }
    }
}

fn render_section(out: &mut String, level: usize, key: &str, value: &toml::Value) {
    out.push_str(&heading(level, &title_case(key)));
    out.push_str("\n\n");

    match value {
        toml::Value::Table(inner) => {
            for (sub_key, sub_value) in inner {
                render_section(out, level + 1, sub_key, sub_value);
            }
        }
        toml::Value::Array(items) => {
            if items.is_empty() {
                out.push_str("*(not set)*\n\n");
            } else {
                for item in items {
                    out.push_str(&format!("- {}\n", scalar_paragraph(item)));
                }
                out.push('\n');
            }
        }
        scalar => {
            out.push_str(&scalar_paragraph(scalar));
            out.push_str("\n\n");
        }
    }
}

fn scalar_paragraph(value: &toml::Value) -> String {
    match value {
        toml::Value::Boolean(true) => "Yes".to_string(),
        toml::Value::Boolean(false) => "No".to_string(),
        toml::Value::String(text) if text.is_empty() => "*(not set)*".to_string(),
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn trim_to_single_newline(mut out: String) -> String {
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_table_renders_deeper_headings() {
        let md = to_markdown("[personal]\nname = \"Alex\"\ngrade = \"12th\"", "student");

        assert!(md.contains("block: student"));
        assert!(md.contains("## Personal"));
        assert!(md.contains("### Name"));
        assert!(md.contains("Alex"));
        assert!(md.contains("### Grade"));
        assert!(md.contains("12th"));
        // Structure is real sections, never a stringified mapping.
        assert!(!md.contains("{'name'"));
    }

    #[test]
    fn booleans_render_yes_no() {
        let md = to_markdown("active = true\npaused = false", "flags");
        assert!(md.contains("## Active\n\nYes"));
        assert!(md.contains("## Paused\n\nNo"));
    }

    #[test]
    fn lists_render_as_bullets() {
        let md = to_markdown("hobbies = [\"reading\", \"chess\"]", "persona");
        assert!(md.contains("## Hobbies"));
        assert!(md.contains("- reading\n- chess"));
    }

    #[test]
    fn empty_string_renders_not_set() {
        let md = to_markdown("bio = \"\"", "persona");
        assert!(md.contains("## Bio\n\n*(not set)*"));
    }

    #[test]
    fn numbers_render_as_text() {
        let md = to_markdown("age = 25", "persona");
        assert!(md.contains("## Age\n\n25"));
    }

    #[test]
    fn invalid_content_falls_back_to_fenced_raw_text() {
        let md = to_markdown("this is { not toml", "persona");
        assert!(md.contains("error: invalid_format"));
        assert!(md.contains("```\nthis is { not toml\n```"));
    }

    #[test]
    fn snake_case_keys_title_case_in_headings() {
        let md = to_markdown("learning_style = \"visual\"", "persona");
        assert!(md.contains("## Learning Style"));
    }
}
