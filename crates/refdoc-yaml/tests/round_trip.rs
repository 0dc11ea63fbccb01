//! Emit/parse stability property tests for refdoc-yaml.
//!
//! ## Purpose
//! Generated node trees are emitted, parsed back, and emitted again. The two
//! renderings must match byte for byte, which is what keeps regenerated
//! documentation free of spurious diffs.
//!
//! ## What is covered
//! - Nested block mappings and sequences with head and line comments.
//! - Plain, quoted, and literal scalars with content-driven quoting.
//! - Arbitrary input never panics the parser.
// crates/refdoc-yaml/tests/round_trip.rs
// ============================================================================
// Module: YAML Round-Trip Property Tests
// Description: Emit, re-parse, and re-emit generated trees.
// Purpose: Ensure emitter output is a fixed point of parse + emit.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use refdoc_yaml::EmitOptions;
use refdoc_yaml::Node;
use refdoc_yaml::Style;
use refdoc_yaml::emit;
use refdoc_yaml::parse_document;

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

fn head_comment() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z]{1,8}( [a-z]{1,8}){0,2}")
}

fn scalar() -> impl Strategy<Value = Node> {
    let styles = [Style::Plain, Style::DoubleQuoted, Style::SingleQuoted];
    prop_oneof![
        4 => ("[a-z][a-z0-9 _.:#'\"/,-]{0,12}", 0 .. styles.len(), prop::option::of("[a-z]{1,6}"))
            .prop_map(move |(text, style, comment)| {
                let mut node = Node::scalar(text).with_style(styles[style]);
                if let Some(comment) = comment {
                    node.comments.line = format!("# {comment}");
                }
                node
            }),
        1 => ("[a-z][a-z ]{0,8}(\n[a-z][a-z ]{0,8}){0,2}\n?")
            .prop_map(|text| Node::scalar(text).with_style(Style::Literal)),
        1 => Just(Node::null()),
    ]
}

fn mapping_of(value: impl Strategy<Value = Node>) -> impl Strategy<Value = Node> {
    prop::collection::btree_map(key(), (head_comment(), value), 1 .. 4).prop_map(|entries| {
        let children = entries
            .into_iter()
            .flat_map(|(name, (comment, value))| {
                let mut key = Node::scalar(name);
                if let Some(comment) = comment {
                    key.comments.head = format!("# {comment}");
                }
                [key, value]
            })
            .collect();
        Node::mapping(children)
    })
}

fn tree() -> impl Strategy<Value = Node> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            mapping_of(inner.clone()),
            prop::collection::vec(inner, 1 .. 4).prop_map(Node::sequence),
        ]
    })
}

proptest! {
    #[test]
    fn emit_is_stable_under_reparse(root in mapping_of(tree())) {
        let options = EmitOptions::default();
        let first = emit(&root, &options).unwrap();
        let parsed = parse_document(&first).unwrap();
        let second = emit(&parsed, &options).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(parsed.root().keys(), root.keys());
    }

    #[test]
    fn parser_never_panics_on_arbitrary_input(text in "(.|\n){0,96}") {
        let _ = parse_document(&text);
    }
}
