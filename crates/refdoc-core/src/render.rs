// crates/refdoc-core/src/render.rs
// ============================================================================
// Module: Snippet Renderer
// Description: Turns node trees into fenced Markdown snippets.
// Purpose: Produce the byte-stable text of overview and section artifacts.
// Dependencies: crate::split, refdoc-yaml, thiserror
// ============================================================================

//! ## Overview
//! Every snippet is a fenced `yaml` block emitted with a two-space indent.
//! Sections add a heading, an optional description paragraph, and a link
//! back to the component's row in the component table. Key snippets show a
//! single top-level key with its value under a ``### `key` configuration``
//! heading.

// ============================================================================
// SECTION: Imports
// ============================================================================

use refdoc_yaml::EmitError;
use refdoc_yaml::EmitOptions;
use refdoc_yaml::Node;
use refdoc_yaml::NodeKind;
use refdoc_yaml::emit;
use thiserror::Error;

use crate::split::Section;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Emitter failure with the snippet it was rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render {context}: {source}")]
pub struct RenderError {
    /// Names the overview, key, or `container.section` being rendered.
    pub context: String,
    /// Underlying emitter error.
    #[source]
    pub source: EmitError,
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `node` as a fenced YAML block, optionally under a `###` heading.
///
/// The node is emitted inside a throwaway document whose root copies its
/// kind, style, and tag, so any subtree renders as a standalone document.
///
/// # Errors
///
/// Returns [`RenderError`] when the tree cannot be emitted.
pub fn render(node: &Node, header: Option<&str>) -> Result<String, RenderError> {
    let context = header.unwrap_or("overview");
    let yaml = fenced(&standalone(node), context)?;
    Ok(match header {
        Some(header) => format!("### {header}\n\n{yaml}"),
        None => yaml,
    })
}

/// Renders one settings section with its description and back link.
///
/// The back link targets `#<prefix><name>`, the anchor of the component's
/// table row, and is followed by a blank separator line.
///
/// # Errors
///
/// Returns [`RenderError`] naming `container.section` on emitter failure.
pub fn render_section(section: &Section, prefix: &str) -> Result<String, RenderError> {
    let context = format!("{}.{}", section.container, section.name);
    let yaml = emit_yaml(&section.document, &context)?;
    let mut out = format!("### {}\n\n", section.name);
    if !section.description.is_empty() {
        out.push_str(&section.description);
        out.push_str("\n\n");
    }
    out.push_str(&format!("```yaml\n{yaml}```\n\n"));
    out.push_str(&format!(
        "[<span title=\"Back to the top\"><FaArrowUp /></span>](#{prefix}{})\n\n\n",
        section.name
    ));
    Ok(out)
}

/// Renders one top-level key with its value as a standalone snippet.
///
/// The wrapping mapping copies the kind, style, and tag of `frame`, the
/// document root, and nothing else.
///
/// # Errors
///
/// Returns [`RenderError`] naming the key on emitter failure.
pub fn render_key_snippet(frame: &Node, key: &Node, value: &Node) -> Result<String, RenderError> {
    let mut wrapper = Node::new(frame.kind).with_style(frame.style).with_tag(frame.tag.clone());
    wrapper.children = vec![key.clone(), value.clone()];
    let yaml = fenced(&wrapper, &key.value)?;
    Ok(format!("### `{}` configuration\n\n{yaml}", key.value))
}

/// Wraps a deep copy of `node` in a document; a document is copied as is.
fn standalone(node: &Node) -> Node {
    if node.kind == NodeKind::Document { node.clone() } else { Node::document(node.clone()) }
}

/// Emits `node` inside a `yaml` fence followed by a blank line.
fn fenced(node: &Node, context: &str) -> Result<String, RenderError> {
    let yaml = emit_yaml(node, context)?;
    Ok(format!("```yaml\n{yaml}```\n\n"))
}

/// Emits `node` with the default two-space indent.
fn emit_yaml(node: &Node, context: &str) -> Result<String, RenderError> {
    emit(node, &EmitOptions::default()).map_err(|source| RenderError {
        context: context.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests;
