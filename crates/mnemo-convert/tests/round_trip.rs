// round_trip.rs — The converter's structural contract, end to end.
//
// Converting content to Markdown and back must preserve the key set and
// nesting shape exactly. Scalar subtypes are allowed to degrade; tables
// are never allowed to collapse into strings.

use std::collections::BTreeMap;

use mnemo_convert::{from_markdown, to_markdown};

/// The nesting shape of structured content: every key mapped to either a
/// leaf or its sub-shape. Scalars and lists are both leaves — only table
/// nesting is structural.
#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Leaf,
    Table(BTreeMap<String, Shape>),
}

fn keys_and_nesting(content: &str) -> Shape {
    let table = content.parse::<toml::Table>().expect("valid content");
    shape_of_table(&table)
}

fn shape_of_table(table: &toml::Table) -> Shape {
    Shape::Table(
        table
            .iter()
            .map(|(key, value)| {
                let shape = match value {
                    toml::Value::Table(inner) => shape_of_table(inner),
                    _ => Shape::Leaf,
                };
                (key.clone(), shape)
            })
            .collect(),
    )
}

fn round_trip(content: &str) -> String {
    let markdown = to_markdown(content, "test_block");
    let (restored, meta) = from_markdown(&markdown).unwrap();
    assert_eq!(meta.block.as_deref(), Some("test_block"));
    restored
}

#[test]
fn flat_scalars_preserve_key_set() {
    let content = "name = \"Alice\"\nage = 25\nactive = true";
    let restored = round_trip(content);
    assert_eq!(keys_and_nesting(content), keys_and_nesting(&restored));
}

#[test]
fn nested_tables_preserve_shape() {
    let content = r#"
summary = "senior year"

[personal]
name = "Alex"
grade = "12th"

[personal.preferences]
diet = "vegetarian"
"#;
    let restored = round_trip(content);
    assert_eq!(keys_and_nesting(content), keys_and_nesting(&restored));
}

#[test]
fn tables_never_collapse_to_strings() {
    let content = "[personal]\nname = \"Alex\"\ngrade = \"12th\"";
    let restored = round_trip(content);

    let table = restored.parse::<toml::Table>().unwrap();
    assert!(
        table["personal"].is_table(),
        "table field collapsed to {:?}",
        table["personal"]
    );
}

#[test]
fn lists_survive_the_round_trip() {
    let content = "hobbies = [\"reading\", \"chess\", \"climbing\"]";
    let restored = round_trip(content);

    let table = restored.parse::<toml::Table>().unwrap();
    let hobbies = table["hobbies"].as_array().unwrap();
    let items: Vec<&str> = hobbies.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(items, vec!["reading", "chess", "climbing"]);
}

#[test]
fn scalar_subtypes_may_degrade_but_values_read_the_same() {
    let content = "age = 25\nactive = true";
    let restored = round_trip(content);

    let table = restored.parse::<toml::Table>().unwrap();
    // Numbers come back as text; booleans come back as their Yes/No rendering.
    assert_eq!(table["age"].as_str(), Some("25"));
    assert_eq!(table["active"].as_str(), Some("Yes"));
}

#[test]
fn empty_scalar_round_trips_through_not_set() {
    let content = "bio = \"\"\nname = \"Alice\"";
    let restored = round_trip(content);

    let table = restored.parse::<toml::Table>().unwrap();
    assert_eq!(table["bio"].as_str(), Some(""));
    assert_eq!(table["name"].as_str(), Some("Alice"));
}

#[test]
fn three_levels_of_nesting_survive() {
    let content = r#"
[courses]
[courses.math]
teacher = "Ms. Chen"
room = "204"
[courses.math.grading]
midterm = "40%"
final = "60%"
"#;
    let restored = round_trip(content);
    assert_eq!(keys_and_nesting(content), keys_and_nesting(&restored));

    let table = restored.parse::<toml::Table>().unwrap();
    let grading = &table["courses"]["math"]["grading"];
    assert!(grading.is_table());
    assert_eq!(grading["midterm"].as_str(), Some("40%"));
}

#[test]
fn invalid_content_round_trips_raw_through_the_fallback() {
    let broken = "name = \"Alice\"\nthis line is { not toml";
    let markdown = to_markdown(broken, "persona");
    assert!(markdown.contains("error: invalid_format"));

    let (restored, meta) = from_markdown(&markdown).unwrap();
    assert!(meta.is_invalid_format());
    assert_eq!(restored.trim_end(), broken);
}

#[test]
fn multi_line_scalars_round_trip() {
    let content = "notes = \"first observation\\nsecond observation\"";
    let restored = round_trip(content);

    let table = restored.parse::<toml::Table>().unwrap();
    assert_eq!(
        table["notes"].as_str(),
        Some("first observation\nsecond observation")
    );
}
