// crates/refdoc-yaml/src/emitter.rs
// ============================================================================
// Module: YAML Emitter
// Description: Deterministic renderer from node trees back to YAML text.
// Purpose: Serialize overview and section documents with stable formatting.
// Dependencies: crate::node, thiserror
// ============================================================================

//! ## Overview
//! The emitter renders any [`Node`] as a standalone YAML document using a
//! fixed indentation step. Collections keep their block or flow style,
//! scalars keep their quoting style when it is safe to do so, and every
//! comment slot is written back in place. Output is a pure function of the
//! tree: no maps, no clocks, no environment.
//!
//! Shape invariants are checked before anything is written, so a malformed
//! synthesized tree fails with [`EmitError::Shape`] instead of producing text
//! that reads back differently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use thiserror::Error;

use crate::node::Node;
use crate::node::NodeKind;
use crate::node::ShapeError;
use crate::node::Style;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default indentation step in spaces.
pub const DEFAULT_INDENT: usize = 2;

/// Emitter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per nesting level (2 through 9).
    pub indent: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

/// Errors raised while emitting a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// The tree violates a structural invariant.
    #[error("cannot emit malformed node tree: {0}")]
    Shape(#[from] ShapeError),
    /// The indentation step is outside the supported range.
    #[error("indent must be between 2 and 9 spaces, got {0}")]
    Indent(usize),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Renders `node` as a YAML document.
///
/// Non-document nodes are rendered as the root of an implicit document.
///
/// # Errors
///
/// Returns [`EmitError`] when the tree is malformed or the indent is invalid.
pub fn emit(node: &Node, options: &EmitOptions) -> Result<String, EmitError> {
    if !(2 ..= 9).contains(&options.indent) {
        return Err(EmitError::Indent(options.indent));
    }
    node.validate_shape()?;
    let mut emitter = Emitter {
        out: String::new(),
        step: options.indent,
    };
    emitter.document(node);
    Ok(emitter.out)
}

// ============================================================================
// SECTION: Emitter
// ============================================================================

/// Output buffer and indentation step.
struct Emitter {
    /// Rendered text.
    out: String,
    /// Spaces per nesting level.
    step: usize,
}

impl Emitter {
    /// Writes a document, unwrapping document nodes.
    fn document(&mut self, node: &Node) {
        if node.kind != NodeKind::Document {
            self.root(node);
            return;
        }
        if !node.comments.head.is_empty() {
            self.comment_block(&node.comments.head, 0);
            self.out.push('\n');
        }
        if let Some(root) = node.children.first() {
            self.root(root);
        }
        self.comment_block(&node.comments.foot, 0);
    }

    /// Writes the root node of a document.
    fn root(&mut self, node: &Node) {
        self.comment_block(&node.comments.head, 0);
        if node.is_block_collection() {
            if node.is_mapping() {
                self.mapping(node, 0, false);
            } else {
                self.sequence(node, 0, false);
            }
        } else if is_block_scalar(node) {
            self.block_scalar(node, 0, &node.comments.line);
        } else {
            let repr = inline(node, false);
            self.out.push_str(if repr.is_empty() { "null" } else { &repr });
            self.line_comment(&node.comments.line);
            self.out.push('\n');
        }
        self.comment_block(&node.comments.foot, 0);
    }

    /// Writes block mapping entries at `indent`.
    ///
    /// With `inline_first`, the first key continues the current line (after
    /// a sequence dash) instead of starting a new one.
    fn mapping(&mut self, node: &Node, indent: usize, inline_first: bool) {
        for (idx, (key, value)) in node.pairs().enumerate() {
            if !(inline_first && idx == 0) {
                self.comment_block(&key.comments.head, indent);
                self.pad(indent);
            }
            let key_repr = inline(key, false);
            self.out.push_str(if key_repr.is_empty() { "\"\"" } else { &key_repr });
            self.out.push(':');
            self.entry_value(key, value, indent);
            self.comment_block(&key.comments.foot, indent);
        }
    }

    /// Writes the value of a mapping entry whose key sits at `indent`.
    fn entry_value(&mut self, key: &Node, value: &Node, indent: usize) {
        let line_comment =
            if value.comments.line.is_empty() { &key.comments.line } else { &value.comments.line };
        let child = indent + self.step;
        if value.is_block_collection() {
            self.out.push_str(&properties(value, true));
            self.line_comment(line_comment);
            self.out.push('\n');
            self.comment_block(&value.comments.head, child);
            if value.is_mapping() {
                self.mapping(value, child, false);
            } else {
                self.sequence(value, child, false);
            }
            self.comment_block(&value.comments.foot, child);
            return;
        }
        if is_block_scalar(value) {
            self.out.push(' ');
            self.block_scalar(value, indent, line_comment);
        } else {
            let repr = inline(value, false);
            if !value.comments.head.is_empty() && !repr.is_empty() {
                self.line_comment(line_comment);
                self.out.push('\n');
                self.comment_block(&value.comments.head, child);
                self.pad(child);
                self.out.push_str(&repr);
                self.out.push('\n');
            } else {
                if !repr.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(&repr);
                }
                self.line_comment(line_comment);
                self.out.push('\n');
            }
        }
        self.comment_block(&value.comments.foot, indent);
    }

    /// Writes block sequence items at `indent`.
    fn sequence(&mut self, node: &Node, indent: usize, inline_first: bool) {
        for (idx, item) in node.children.iter().enumerate() {
            if !(inline_first && idx == 0) {
                self.comment_block(&item.comments.head, indent);
                self.pad(indent);
            }
            self.out.push('-');
            self.item(item, indent);
            self.comment_block(&item.comments.foot, indent);
        }
    }

    /// Writes one sequence item after its dash.
    fn item(&mut self, item: &Node, indent: usize) {
        let child = indent + self.step;
        let gap = " ".repeat(self.step - 1);
        if item.is_block_collection() {
            let compact = item.anchor.is_none()
                && item.tag.is_none()
                && item.comments.line.is_empty()
                && item.children.first().is_none_or(|first| first.comments.head.is_empty());
            if compact {
                self.out.push_str(&gap);
            } else {
                self.out.push_str(&properties(item, true));
                self.line_comment(&item.comments.line);
                self.out.push('\n');
            }
            if item.is_mapping() {
                self.mapping(item, child, compact);
            } else {
                self.sequence(item, child, compact);
            }
        } else if is_block_scalar(item) {
            self.out.push(' ');
            self.block_scalar(item, indent, &item.comments.line);
        } else {
            let repr = inline(item, false);
            if !repr.is_empty() {
                self.out.push_str(&gap);
                self.out.push_str(&repr);
            }
            self.line_comment(&item.comments.line);
            self.out.push('\n');
        }
    }

    /// Writes a literal or folded block scalar whose parent sits at `indent`.
    ///
    /// The caller has already written the text preceding the header.
    fn block_scalar(&mut self, node: &Node, indent: usize, line_comment: &str) {
        let (body, chomp) = match node.value.strip_suffix('\n') {
            Some(rest) if rest.is_empty() || rest.ends_with('\n') => (rest, "+"),
            Some(rest) => (rest, ""),
            None => (node.value.as_str(), "-"),
        };
        let folded = if node.style == Style::Folded { folded_lines(body) } else { None };
        let (marker, lines) = match folded {
            Some(lines) => ('>', lines),
            None => ('|', body.split('\n').collect()),
        };
        let indicator = lines
            .iter()
            .find(|line| !line.is_empty())
            .is_some_and(|line| line.starts_with([' ', '\t']));

        let props = properties(node, false);
        if !props.is_empty() {
            self.out.push_str(&props);
            self.out.push(' ');
        }
        self.out.push(marker);
        if indicator {
            let _ = write!(self.out, "{}", self.step);
        }
        self.out.push_str(chomp);
        self.line_comment(line_comment);
        self.out.push('\n');

        let child = indent + self.step;
        for line in lines {
            if !line.is_empty() {
                self.pad(child);
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    /// Writes comment lines at `indent`; empty lines become blank lines.
    fn comment_block(&mut self, text: &str, indent: usize) {
        if text.is_empty() {
            return;
        }
        for line in text.split('\n') {
            if !line.is_empty() {
                self.pad(indent);
                if !line.starts_with('#') {
                    self.out.push_str("# ");
                }
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    /// Appends a trailing line comment.
    fn line_comment(&mut self, text: &str) {
        let Some(first) = text.lines().next().filter(|line| !line.is_empty()) else {
            return;
        };
        self.out.push(' ');
        if !first.starts_with('#') {
            self.out.push_str("# ");
        }
        self.out.push_str(first);
    }

    /// Writes `indent` spaces.
    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }
}

// ============================================================================
// SECTION: Inline Rendering
// ============================================================================

/// Returns true when a scalar should be written as a `|` or `>` block.
fn is_block_scalar(node: &Node) -> bool {
    node.is_scalar()
        && matches!(node.style, Style::Literal | Style::Folded)
        && !node.value.is_empty()
        && !node.value.chars().any(|ch| ch.is_control() && ch != '\n' && ch != '\t')
}

/// Renders anchor and tag properties.
///
/// With `leading`, the result starts with a space (for use after `key:`);
/// otherwise properties are space-separated with no leading space.
fn properties(node: &Node, leading: bool) -> String {
    let mut parts = Vec::new();
    if let Some(anchor) = &node.anchor {
        parts.push(format!("&{anchor}"));
    }
    if let Some(tag) = &node.tag {
        parts.push(tag.clone());
    }
    let joined = parts.join(" ");
    if leading && !joined.is_empty() { format!(" {joined}") } else { joined }
}

/// Renders a node on a single line (scalars, aliases, flow collections).
fn inline(node: &Node, flow: bool) -> String {
    let body = match node.kind {
        NodeKind::Alias => format!("*{}", node.value),
        NodeKind::Scalar => scalar_repr(node, flow),
        NodeKind::Mapping => {
            let entries: Vec<String> = node
                .pairs()
                .map(|(key, value)| format!("{}: {}", inline(key, true), inline(value, true)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        NodeKind::Sequence => {
            let items: Vec<String> = node.children.iter().map(|item| inline(item, true)).collect();
            format!("[{}]", items.join(", "))
        }
        NodeKind::Document => return node.children.first().map_or_else(String::new, |root| inline(root, flow)),
    };
    let props = properties(node, false);
    match (props.is_empty(), body.is_empty()) {
        (true, _) => body,
        (false, true) => props,
        (false, false) => format!("{props} {body}"),
    }
}

/// Renders a scalar honoring its style where the value allows it.
fn scalar_repr(node: &Node, flow: bool) -> String {
    let value = node.value.as_str();
    match node.style {
        Style::Plain | Style::Flow => {
            if value.is_empty() {
                if flow { "null".to_string() } else { String::new() }
            } else if is_plain_safe(value, flow) {
                value.to_string()
            } else {
                double_quote(value)
            }
        }
        Style::SingleQuoted if !value.chars().any(char::is_control) => {
            format!("'{}'", value.replace('\'', "''"))
        }
        Style::SingleQuoted | Style::DoubleQuoted | Style::Literal | Style::Folded => {
            double_quote(value)
        }
    }
}

/// Returns true when `value` reads back as the same string without quotes.
fn is_plain_safe(value: &str, flow: bool) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if value != value.trim()
        || value.chars().any(char::is_control)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.starts_with("---")
        || value.starts_with("...")
    {
        return false;
    }
    if matches!(first, '-' | '?' | ':') {
        if chars.next().is_none_or(char::is_whitespace) {
            return false;
        }
    } else if matches!(
        first,
        ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
    ) {
        return false;
    }
    !(flow && value.contains([',', '[', ']', '{', '}']))
}

/// Renders a double-quoted scalar with escapes.
fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(ch));
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Splits a folded scalar body into output lines, or `None` when the body
/// needs literal style (more-indented lines).
fn folded_lines(body: &str) -> Option<Vec<&str>> {
    let mut lines = Vec::new();
    let mut pending = 0;
    let mut emitted = false;
    for segment in body.split('\n') {
        if segment.is_empty() {
            pending += 1;
            continue;
        }
        if segment.starts_with([' ', '\t']) {
            return None;
        }
        let blanks = if emitted { pending + 1 } else { pending };
        lines.extend(std::iter::repeat_n("", blanks));
        lines.push(segment);
        emitted = true;
        pending = 0;
    }
    lines.extend(std::iter::repeat_n("", pending));
    Some(lines)
}
