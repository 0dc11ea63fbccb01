// crates/refdoc-yaml/src/node.rs
// ============================================================================
// Module: YAML Node Model
// Description: Ordered, comment-carrying node tree for YAML documents.
// Purpose: Represent parsed documents so derived trees can be built by copy.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`Node`] is one element of a YAML document: a document wrapper, a
//! mapping, a sequence, a scalar, or an alias. Mappings store their entries as
//! a flat, ordered `key, value, key, value, ...` child list so insertion order
//! is preserved exactly as it appears in the source.
//!
//! Derived trees are never built by mutating a parsed tree in place. Callers
//! take a [`Node::detached`] header copy and attach freshly cloned children,
//! so the same source subtree can appear in several outputs in different
//! forms without aliasing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document wrapper holding exactly one root node.
    Document,
    /// Mapping with alternating key and value children.
    Mapping,
    /// Sequence of value children.
    Sequence,
    /// Scalar carrying a string payload.
    Scalar,
    /// Alias referencing an anchor by name.
    Alias,
}

impl NodeKind {
    /// Returns the lowercase kind label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
            Self::Alias => "alias",
        }
    }
}

/// Rendering style marker preserved across copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Plain scalars and block collections.
    #[default]
    Plain,
    /// Double-quoted scalar.
    DoubleQuoted,
    /// Single-quoted scalar.
    SingleQuoted,
    /// Literal block scalar (`|`).
    Literal,
    /// Folded block scalar (`>`).
    Folded,
    /// Flow collection (`[a, b]` or `{a: b}`).
    Flow,
}

/// Comment slots attached positionally to a node.
///
/// # Invariants
/// - Each slot holds raw comment lines joined by `\n`. Lines normally start
///   with `#`; lines without a marker are rendered with a `# ` prefix and empty
///   lines render as blank separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Comments {
    /// Comment lines rendered above the node.
    pub head: String,
    /// Comment rendered at the end of the node's line.
    pub line: String,
    /// Comment lines rendered after the node.
    pub foot: String,
}

impl Comments {
    /// Returns true when no slot carries a comment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.line.is_empty() && self.foot.is_empty()
    }
}

/// One node of a YAML document tree.
///
/// # Invariants
/// - Mapping children have even length (`key, value` pairs in order).
/// - Document nodes hold exactly one child.
/// - Scalars and aliases have no children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Structural kind.
    pub kind: NodeKind,
    /// Explicit tag from the source, emitted verbatim when present.
    pub tag: Option<String>,
    /// Rendering style marker.
    pub style: Style,
    /// Scalar payload, or the anchor name for aliases.
    pub value: String,
    /// Anchor declared on this node.
    pub anchor: Option<String>,
    /// Ordered children.
    pub children: Vec<Self>,
    /// Attached comments.
    pub comments: Comments,
}

/// Shape invariant violation found in a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Mapping with an odd number of children.
    #[error("mapping at `{path}` has an odd number of children ({len})")]
    OddMapping {
        /// Dotted path of keys leading to the mapping.
        path: String,
        /// Observed child count.
        len: usize,
    },
    /// Document that does not wrap exactly one root.
    #[error("document at `{path}` must hold exactly one root node, found {len}")]
    DocumentArity {
        /// Dotted path of keys leading to the document.
        path: String,
        /// Observed child count.
        len: usize,
    },
    /// Scalar or alias carrying children.
    #[error("leaf node at `{path}` must not have children")]
    LeafChildren {
        /// Dotted path of keys leading to the leaf.
        path: String,
    },
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl Node {
    /// Creates an empty node of the given kind.
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag: None,
            style: Style::Plain,
            value: String::new(),
            anchor: None,
            children: Vec::new(),
            comments: Comments {
                head: String::new(),
                line: String::new(),
                foot: String::new(),
            },
        }
    }

    /// Creates a plain scalar.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Scalar);
        node.value = value.into();
        node
    }

    /// Creates a plain empty scalar, rendered as a null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::new(NodeKind::Scalar)
    }

    /// Creates a block mapping from alternating key and value children.
    #[must_use]
    pub fn mapping(children: Vec<Self>) -> Self {
        let mut node = Self::new(NodeKind::Mapping);
        node.children = children;
        node
    }

    /// Creates a block sequence.
    #[must_use]
    pub fn sequence(children: Vec<Self>) -> Self {
        let mut node = Self::new(NodeKind::Sequence);
        node.children = children;
        node
    }

    /// Wraps a root node into a document.
    #[must_use]
    pub fn document(root: Self) -> Self {
        let mut node = Self::new(NodeKind::Document);
        node.children = vec![root];
        node
    }

    /// Creates an alias referencing `name`.
    #[must_use]
    pub fn alias(name: impl Into<String>) -> Self {
        let mut node = Self::new(NodeKind::Alias);
        node.value = name.into();
        node
    }

    /// Returns the node with its head comment replaced.
    #[must_use]
    pub fn with_head_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.head = comment.into();
        self
    }

    /// Returns the node with its style replaced.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Returns the node with its tag replaced.
    #[must_use]
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Copies every field of this node except its children.
    ///
    /// This is the copy constructor used for tree surgery: the result keeps
    /// kind, style, tag, value, anchor, and comments, and starts with no
    /// children so the caller decides what to attach.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            kind: self.kind,
            tag: self.tag.clone(),
            style: self.style,
            value: self.value.clone(),
            anchor: self.anchor.clone(),
            children: Vec::new(),
            comments: self.comments.clone(),
        }
    }
}

// ============================================================================
// SECTION: Inspection
// ============================================================================

impl Node {
    /// Returns true for mapping nodes.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        self.kind == NodeKind::Mapping
    }

    /// Returns true for sequence nodes.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.kind == NodeKind::Sequence
    }

    /// Returns true for scalar nodes.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.kind == NodeKind::Scalar
    }

    /// Returns true for a mapping or sequence rendered in block style with at
    /// least one child.
    #[must_use]
    pub fn is_block_collection(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping | NodeKind::Sequence)
            && self.style != Style::Flow
            && !self.children.is_empty()
    }

    /// Returns the document root for document nodes, or the node itself.
    #[must_use]
    pub fn root(&self) -> &Self {
        match (self.kind, self.children.first()) {
            (NodeKind::Document, Some(root)) => root,
            _ => self,
        }
    }

    /// Iterates mapping entries as `(key, value)` pairs in source order.
    ///
    /// A trailing key without a value is skipped; [`Node::validate_shape`]
    /// reports it.
    pub fn pairs(&self) -> impl Iterator<Item = (&Self, &Self)> {
        self.children.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Looks up a mapping value by scalar key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        if !self.is_mapping() {
            return None;
        }
        self.pairs().find(|(k, _)| k.is_scalar() && k.value == key).map(|(_, v)| v)
    }

    /// Returns the scalar keys of a mapping in source order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        if !self.is_mapping() {
            return Vec::new();
        }
        self.pairs().map(|(k, _)| k.value.as_str()).collect()
    }

    /// Checks the structural invariants of the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] for the first violation found in document order.
    pub fn validate_shape(&self) -> Result<(), ShapeError> {
        self.validate_at(&mut Vec::new())
    }

    /// Recursive shape check tracking the key path for error context.
    fn validate_at<'a>(&'a self, path: &mut Vec<&'a str>) -> Result<(), ShapeError> {
        match self.kind {
            NodeKind::Document => {
                if self.children.len() != 1 {
                    return Err(ShapeError::DocumentArity {
                        path: join_path(path),
                        len: self.children.len(),
                    });
                }
            }
            NodeKind::Mapping => {
                if self.children.len() % 2 != 0 {
                    return Err(ShapeError::OddMapping {
                        path: join_path(path),
                        len: self.children.len(),
                    });
                }
                for (key, value) in self.pairs() {
                    key.validate_at(path)?;
                    path.push(key.value.as_str());
                    let result = value.validate_at(path);
                    path.pop();
                    result?;
                }
                return Ok(());
            }
            NodeKind::Sequence => {}
            NodeKind::Scalar | NodeKind::Alias => {
                if !self.children.is_empty() {
                    return Err(ShapeError::LeafChildren {
                        path: join_path(path),
                    });
                }
            }
        }
        for child in &self.children {
            child.validate_at(path)?;
        }
        Ok(())
    }
}

/// Renders a key path for error messages.
fn join_path(path: &[&str]) -> String {
    if path.is_empty() { "<root>".to_string() } else { path.join(".") }
}
