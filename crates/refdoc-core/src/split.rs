// crates/refdoc-core/src/split.rs
// ============================================================================
// Module: Settings Section Splitter
// Description: Extracts per-component settings into standalone documents.
// Purpose: Give each component its own renderable settings fragment.
// Dependencies: crate::index, crate::policy, crate::events, refdoc-yaml
// ============================================================================

//! ## Overview
//! A container value (`linters` or `formatters`) may hold a `settings`
//! mapping of component name to settings body. Every `(name, body)` pair
//! becomes a [`Section`] whose document nests a copy of the body back under
//! `container.settings.name`, so the fragment renders with the same shape and
//! indentation it has in the full reference document.
//!
//! The splitter also returns a redacted copy of the container value in which
//! each settings body is replaced by a placeholder pointing at its section.
//! Sections keep source order; nothing is re-sorted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use refdoc_yaml::Node;
use refdoc_yaml::NodeKind;

use crate::events::EventKind;
use crate::events::EventSink;
use crate::events::GenerationEvent;
use crate::index::DescriptionIndex;
use crate::policy::SETTINGS_KEY;
use crate::policy::placeholder;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One extracted settings section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Container key the section belongs to.
    pub container: String,
    /// Component name under `settings`.
    pub name: String,
    /// Display description; empty when the index has no entry.
    pub description: String,
    /// Standalone document `{container: {settings: {name: body}}}`.
    pub document: Node,
}

impl Section {
    /// Returns the settings body carried by the section document.
    #[must_use]
    pub fn body(&self) -> Option<&Node> {
        self.document
            .root()
            .get(&self.container)
            .and_then(|container| container.get(SETTINGS_KEY))
            .and_then(|settings| settings.get(&self.name))
    }
}

/// Output of [`split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// Sections in source order.
    pub sections: Vec<Section>,
    /// Container value with every settings body replaced by a placeholder.
    pub redacted_container: Node,
}

// ============================================================================
// SECTION: Splitting
// ============================================================================

/// Splits the `settings` mapping of a container into sections.
///
/// A container that is not a mapping, or has no mapping under `settings`,
/// yields zero sections and an unchanged copy of the value. Index misses
/// leave the description empty and are recorded as events.
#[must_use]
pub fn split(
    container_key: &Node,
    container_value: &Node,
    index: &DescriptionIndex,
    sink: &dyn EventSink,
) -> SplitResult {
    let container = container_key.value.as_str();
    let settings = container_value
        .is_mapping()
        .then(|| container_value.pairs().find(|(key, _)| key.is_scalar() && key.value == SETTINGS_KEY))
        .flatten()
        .filter(|(_, value)| value.is_mapping());
    let Some((_, settings_value)) = settings else {
        sink.record(
            &GenerationEvent::new(EventKind::SettingsMissing)
                .with_container(container)
                .with_detail("no settings mapping in container"),
        );
        return SplitResult {
            sections: Vec::new(),
            redacted_container: container_value.clone(),
        };
    };

    let mut sections = Vec::new();
    let mut redacted_settings = settings_value.detached();
    for (name_node, body) in settings_value.pairs() {
        let name = name_node.value.as_str();
        let description = match index.get(name) {
            Some(description) => description.to_string(),
            None => {
                sink.record(
                    &GenerationEvent::new(EventKind::DescriptionMissing)
                        .with_container(container)
                        .with_section(name),
                );
                String::new()
            }
        };
        sections.push(Section {
            container: container.to_string(),
            name: name.to_string(),
            description,
            document: section_document(container_key, settings_value, name_node, body),
        });
        redacted_settings.children.push(name_node.clone());
        redacted_settings.children.push(placeholder(name_node, &format!("{container}.{name}")));
    }

    let mut redacted_container = container_value.detached();
    for (key, value) in container_value.pairs() {
        redacted_container.children.push(key.clone());
        if std::ptr::eq(value, settings_value) {
            redacted_container.children.push(redacted_settings.clone());
        } else {
            redacted_container.children.push(value.clone());
        }
    }

    SplitResult {
        sections,
        redacted_container,
    }
}

/// Builds `{container: {settings: {name: body}}}` from copies.
///
/// Wrapper nodes copy only tags: the container key's for both keys and the
/// settings mapping's for both mappings that hold entries. No comments from
/// the surrounding document are carried over.
fn section_document(container_key: &Node, settings_value: &Node, name: &Node, body: &Node) -> Node {
    let settings_mapping = Node::mapping(vec![name.clone(), body.clone()]).with_tag(settings_value.tag.clone());
    let settings_entry = Node::scalar(SETTINGS_KEY).with_tag(container_key.tag.clone());
    let container_mapping = Node::mapping(vec![settings_entry, settings_mapping]);
    let container_entry = Node::scalar(container_key.value.clone()).with_tag(container_key.tag.clone());
    let root = Node::new(NodeKind::Mapping).with_tag(settings_value.tag.clone());
    Node::document(Node {
        children: vec![container_entry, container_mapping],
        ..root
    })
}
