// crates/refdoc-core/src/render/tests.rs
// ============================================================================
// Module: Snippet Renderer Tests
// Description: Unit tests for fenced snippet output.
// Purpose: Pin the exact Markdown framing of every snippet kind.
// Dependencies: refdoc-core, refdoc-yaml
// ============================================================================

//! ## Overview
//! Output is compared byte for byte since generated pages are diffed in CI.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use refdoc_yaml::EmitError;
use refdoc_yaml::Node;
use refdoc_yaml::NodeKind;
use refdoc_yaml::ShapeError;

use super::render;
use super::render_key_snippet;
use super::render_section;
use crate::split::Section;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn section(description: &str) -> Section {
    let body = Node::mapping(vec![Node::scalar("allow-unused"), Node::scalar("false")]);
    let settings = Node::mapping(vec![Node::scalar("nolintlint"), body]);
    let container = Node::mapping(vec![Node::scalar("settings"), settings]);
    Section {
        container: "linters".to_string(),
        name: "nolintlint".to_string(),
        description: description.to_string(),
        document: Node::document(Node::mapping(vec![Node::scalar("linters"), container])),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn render_without_header_is_a_bare_fence() {
    let node = Node::mapping(vec![Node::scalar("version"), Node::scalar("2")]);
    assert_eq!(render(&node, None).unwrap(), "```yaml\nversion: 2\n```\n\n");
}

#[test]
fn render_with_header_adds_heading() {
    let node = Node::mapping(vec![Node::scalar("a"), Node::scalar("b")]);
    assert_eq!(render(&node, Some("Title")).unwrap(), "### Title\n\n```yaml\na: b\n```\n\n");
}

#[test]
fn render_wraps_subtrees_in_a_document() {
    let node = Node::mapping(vec![Node::scalar("a"), Node::scalar("b")])
        .with_tag(Some("!custom".to_string()));
    let wrapped = Node::document(node.clone());
    assert_eq!(render(&node, None).unwrap(), render(&wrapped, None).unwrap());
    assert_eq!(super::standalone(&node), wrapped);
    assert_eq!(super::standalone(&wrapped), wrapped);

    let scalar = Node::scalar("plain");
    assert_eq!(super::standalone(&scalar).kind, NodeKind::Document);
    assert_eq!(render(&scalar, None).unwrap(), "```yaml\nplain\n```\n\n");
}

#[test]
fn section_includes_description_and_back_link() {
    let text = render_section(&section("Reports ill-formed nolint directives."), "list-item-").unwrap();
    let expected = "\
### nolintlint

Reports ill-formed nolint directives.

```yaml
linters:
  settings:
    nolintlint:
      allow-unused: false
```

[<span title=\"Back to the top\"><FaArrowUp /></span>](#list-item-nolintlint)


";
    assert_eq!(text, expected);
}

#[test]
fn section_without_description_omits_paragraph() {
    let text = render_section(&section(""), "p-").unwrap();
    assert!(text.starts_with("### nolintlint\n\n```yaml\n"));
    assert!(text.contains("(#p-nolintlint)"));
}

#[test]
fn key_snippet_wraps_key_and_value() {
    let frame = Node::mapping(Vec::new()).with_head_comment("# not copied");
    let key = Node::scalar("version").with_head_comment("# Version of the file.");
    let value = Node::scalar("2");
    let text = render_key_snippet(&frame, &key, &value).unwrap();
    assert_eq!(text, "### `version` configuration\n\n```yaml\n# Version of the file.\nversion: 2\n```\n\n");
}

#[test]
fn malformed_tree_reports_context() {
    let mut broken = Node::new(NodeKind::Mapping);
    broken.children.push(Node::scalar("dangling"));
    let mut bad = section("");
    bad.document = Node::document(broken.clone());

    let err = render_section(&bad, "").unwrap_err();
    assert_eq!(err.context, "linters.nolintlint");
    assert!(matches!(err.source, EmitError::Shape(ShapeError::OddMapping { .. })));
    assert!(err.to_string().starts_with("failed to render linters.nolintlint: "));

    let err = render(&broken, None).unwrap_err();
    assert_eq!(err.context, "overview");
}
