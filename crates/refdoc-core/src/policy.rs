// crates/refdoc-core/src/policy.rs
// ============================================================================
// Module: Top-Level Key Policy
// Description: Closed policy table for documented top-level keys.
// Purpose: Keep the overview allow-list auditable apart from tree walking.
// Dependencies: refdoc-yaml
// ============================================================================

//! ## Overview
//! Every top-level key of the reference document is classified by a fixed
//! table: replaced by a placeholder, embedded verbatim with a pointer comment,
//! or dropped from the overview. Two of the placeholder keys are containers
//! whose `settings` mapping is split into per-component sections.
//!
//! Adding a new documented top-level key means adding a row to
//! [`POLICY_TABLE`]; anything not listed is dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use refdoc_yaml::Node;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key holding per-component settings inside a container.
pub const SETTINGS_KEY: &str = "settings";
/// Key of the first placeholder entry.
pub const PLACEHOLDER_OPTION: &str = "option";
/// Key of the second placeholder entry.
pub const PLACEHOLDER_VALUE: &str = "value";
/// Container keys in table order.
pub const CONTAINER_KEYS: [&str; 2] = ["linters", "formatters"];

// ============================================================================
// SECTION: Policy Table
// ============================================================================

/// Treatment of one top-level key in the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Replace the value with a placeholder pair.
    Placeholder,
    /// Keep the value verbatim; attach a pointer comment to the key.
    EmbedWithComment,
    /// Leave the key out of the overview.
    Drop,
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyEntry {
    /// Top-level key name.
    pub key: &'static str,
    /// Overview treatment.
    pub policy: KeyPolicy,
    /// Whether the key's `settings` mapping is split into sections.
    pub container: bool,
}

/// Documented top-level keys in their canonical order.
pub const POLICY_TABLE: [PolicyEntry; 7] = [
    PolicyEntry {
        key: "run",
        policy: KeyPolicy::Placeholder,
        container: false,
    },
    PolicyEntry {
        key: "output",
        policy: KeyPolicy::Placeholder,
        container: false,
    },
    PolicyEntry {
        key: "linters",
        policy: KeyPolicy::Placeholder,
        container: true,
    },
    PolicyEntry {
        key: "formatters",
        policy: KeyPolicy::Placeholder,
        container: true,
    },
    PolicyEntry {
        key: "issues",
        policy: KeyPolicy::Placeholder,
        container: false,
    },
    PolicyEntry {
        key: "severity",
        policy: KeyPolicy::Placeholder,
        container: false,
    },
    PolicyEntry {
        key: "version",
        policy: KeyPolicy::EmbedWithComment,
        container: false,
    },
];

/// Returns the table row for `key`, if listed.
#[must_use]
pub fn entry_for(key: &str) -> Option<&'static PolicyEntry> {
    POLICY_TABLE.iter().find(|entry| entry.key == key)
}

/// Returns the overview treatment of `key`.
#[must_use]
pub fn policy_for(key: &str) -> KeyPolicy {
    entry_for(key).map_or(KeyPolicy::Drop, |entry| entry.policy)
}

/// Returns true when `key` is a container split into sections.
#[must_use]
pub fn is_container(key: &str) -> bool {
    entry_for(key).is_some_and(|entry| entry.container)
}

// ============================================================================
// SECTION: Synthesized Nodes
// ============================================================================

/// Builds the documentation pointer comment for `target`.
#[must_use]
pub fn pointer_comment(target: &str) -> String {
    format!("See the dedicated \"{target}\" documentation section.")
}

/// Creates a childless node copying the kind, style, and tag of `template`
/// with the given scalar value.
#[must_use]
pub fn header_copy(template: &Node, value: &str) -> Node {
    let mut node = Node::new(template.kind).with_style(template.style).with_tag(template.tag.clone());
    node.value = value.to_string();
    node
}

/// Builds the placeholder pair standing in for a redacted subtree.
///
/// The result is a two-entry mapping `option: value` whose key and value
/// copy the kind, style, and tag of `template`; the `option` key carries the
/// pointer comment for `target`.
#[must_use]
pub fn placeholder(template: &Node, target: &str) -> Node {
    let option = header_copy(template, PLACEHOLDER_OPTION).with_head_comment(pointer_comment(target));
    let value = header_copy(template, PLACEHOLDER_VALUE);
    Node::mapping(vec![option, value])
}

/// Returns true when `node` has the exact placeholder shape.
#[must_use]
pub fn is_placeholder(node: &Node) -> bool {
    node.is_mapping()
        && node.children.len() == 2
        && node.keys() == [PLACEHOLDER_OPTION]
        && node.get(PLACEHOLDER_OPTION).is_some_and(|value| value.value == PLACEHOLDER_VALUE)
}
