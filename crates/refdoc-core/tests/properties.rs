//! Property tests for snippet generation in refdoc-core.
//!
//! ## Purpose
//! Generates reference documents with random top-level key orders, unlisted
//! keys, and settings entries, then checks that every build preserves order,
//! keeps the placeholder shape, extracts each section exactly once, and is
//! byte-stable.
// crates/refdoc-core/tests/properties.rs
// =============================================================================
// Module: Snippet Property Tests
// Description: Randomized documents through the full pipeline.
// Purpose: Ensure structural guarantees hold beyond hand-picked fixtures.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use refdoc_core::SnippetBuilder;
use refdoc_core::policy::KeyPolicy;
use refdoc_core::policy::is_placeholder;
use refdoc_core::policy::policy_for;
use refdoc_yaml::parse_document;

const TOP_LEVEL_POOL: [&str; 10] =
    ["run", "output", "linters", "formatters", "issues", "severity", "version", "plugins", "custom", "x-extra"];

/// One generated top-level entry: key and settings names (containers only).
#[derive(Debug, Clone)]
struct Entry {
    key: &'static str,
    sections: Vec<String>,
}

fn entries() -> impl Strategy<Value = Vec<Entry>> {
    Just(TOP_LEVEL_POOL.to_vec())
        .prop_shuffle()
        .prop_flat_map(|keys| {
            let count = keys.len();
            (Just(keys), 1 ..= count, prop::collection::vec(section_names(), count))
        })
        .prop_map(|(keys, take, sections)| {
            keys.into_iter()
                .take(take)
                .zip(sections)
                .map(|(key, sections)| Entry {
                    key,
                    sections,
                })
                .collect()
        })
}

fn section_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,6}", 0 .. 5).prop_map(|names| names.into_iter().collect())
}

fn render_document(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry.key {
            "version" => out.push_str("version: \"2\"\n"),
            "linters" | "formatters" => {
                out.push_str(&format!("{}:\n  enable:\n    - a\n", entry.key));
                if !entry.sections.is_empty() {
                    out.push_str("  settings:\n");
                    for name in &entry.sections {
                        out.push_str(&format!("    # About {name}.\n    {name}:\n      flag-{name}: true\n"));
                    }
                }
            }
            key => out.push_str(&format!("# The {key} key.\n{key}:\n  option-{key}: 1\n")),
        }
    }
    out
}

fn fenced_yaml(text: &str) -> &str {
    let start = text.find("```yaml\n").map_or(0, |idx| idx + "```yaml\n".len());
    let end = text[start ..].find("```").map_or(text.len(), |idx| start + idx);
    &text[start .. end]
}

proptest! {
    #[test]
    fn overview_order_and_shape_hold(entries in entries()) {
        let text = render_document(&entries);
        let snippets = SnippetBuilder::new(BTreeMap::new()).build(&text).unwrap();
        let overview = parse_document(fenced_yaml(&snippets.overview)).unwrap();
        let root = overview.root();

        let expected: Vec<&str> = entries
            .iter()
            .map(|entry| entry.key)
            .filter(|key| policy_for(key) != KeyPolicy::Drop)
            .collect();
        prop_assert_eq!(root.keys(), expected);

        for (key, value) in root.pairs() {
            if policy_for(&key.value) == KeyPolicy::Placeholder {
                prop_assert!(is_placeholder(value));
            }
        }
    }

    #[test]
    fn every_settings_entry_is_extracted_once(entries in entries()) {
        let text = render_document(&entries);
        let snippets = SnippetBuilder::new(BTreeMap::new()).build(&text).unwrap();
        for container in ["linters", "formatters"] {
            let expected: Vec<&str> = entries
                .iter()
                .find(|entry| entry.key == container)
                .map(|entry| entry.sections.iter().map(String::as_str).collect())
                .unwrap_or_default();
            prop_assert_eq!(snippets.section_names(container), expected.clone());
            for ((name, section), other) in snippets.sections[container].iter().zip(expected.iter().cycle().skip(1)) {
                let expected_flag = format!("flag-{name}: true");
                prop_assert!(section.contains(&expected_flag));
                if *other != name.as_str() {
                    let other_flag = format!("flag-{other}:");
                    prop_assert!(!section.contains(&other_flag));
                }
            }
        }
    }

    #[test]
    fn builds_are_idempotent(entries in entries()) {
        let text = render_document(&entries);
        let builder = SnippetBuilder::new(BTreeMap::new());
        let first = builder.build(&text).unwrap();
        let second = builder.build(&text).unwrap();
        prop_assert_eq!(first, second);
    }
}
