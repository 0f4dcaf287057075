// headings.rs — Heading text helpers shared by render and parse.
//
// Keys are snake_case in structured content and Title Case in Markdown
// headings. Both transforms only touch the first letter of each word, so
// the round trip is exact for lowercase snake_case keys.

/// Markdown caps heading depth at h6.
pub const MAX_HEADING_LEVEL: usize = 6;

/// `progress_notes` → `Progress Notes`.
pub fn title_case(key: &str) -> String {
    key.split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Progress Notes` → `progress_notes`.
pub fn snake_case(title: &str) -> String {
    title
        .split_whitespace()
        .map(lowercase_first)
        .collect::<Vec<_>>()
        .join("_")
}

/// Emit a heading line at the given level (clamped to h6).
pub fn heading(level: usize, text: &str) -> String {
    let level = level.min(MAX_HEADING_LEVEL);
    format!("{} {}", "#".repeat(level), text)
}

/// Parse a heading line into (level, title). Returns None for non-headings.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_end();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > MAX_HEADING_LEVEL {
        return None;
    }
    let rest = &trimmed[hashes..];
    let title = rest.strip_prefix(' ')?.trim();
    if title.is_empty() {
        return None;
    }
    Some((hashes, title))
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_splits_on_underscores() {
        assert_eq!(title_case("progress_notes"), "Progress Notes");
        assert_eq!(title_case("name"), "Name");
    }

    #[test]
    fn snake_case_reverses_title_case() {
        assert_eq!(snake_case("Progress Notes"), "progress_notes");
        assert_eq!(snake_case(&title_case("learning_style")), "learning_style");
    }

    #[test]
    fn mixed_case_single_words_survive() {
        assert_eq!(snake_case(&title_case("apiKeys")), "apiKeys");
    }

    #[test]
    fn heading_levels_are_clamped() {
        assert_eq!(heading(2, "Personal"), "## Personal");
        assert_eq!(heading(9, "Deep"), "###### Deep");
    }

    #[test]
    fn parse_heading_matches_emitted_headings() {
        assert_eq!(parse_heading("## Personal"), Some((2, "Personal")));
        assert_eq!(parse_heading("### Progress Notes"), Some((3, "Progress Notes")));
        assert_eq!(parse_heading("Personal"), None);
        assert_eq!(parse_heading("##NoSpace"), None);
        assert_eq!(parse_heading("## "), None);
    }
}
