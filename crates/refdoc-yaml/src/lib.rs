// crates/refdoc-yaml/src/lib.rs
// ============================================================================
// Module: refdoc YAML Library
// Description: Comment-preserving YAML node model, parser, and emitter.
// Purpose: Give the generator an ordered tree it can copy and re-render.
// Dependencies: serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! `refdoc-yaml` reads a YAML document into an ordered [`Node`] tree that
//! keeps key order, scalar styles, tags, anchors, and head, line, and foot
//! comments. The emitter renders any tree (parsed or synthesized) back to
//! deterministic text.
//!
//! Input is treated as untrusted: documents are size-capped, nesting depth is
//! bounded, and well-formedness is confirmed with `serde_yaml` before the
//! structural pass runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod emitter;
pub mod node;
pub mod parser;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use emitter::DEFAULT_INDENT;
pub use emitter::EmitError;
pub use emitter::EmitOptions;
pub use emitter::emit;
pub use node::Comments;
pub use node::Node;
pub use node::NodeKind;
pub use node::ShapeError;
pub use node::Style;
pub use parser::MAX_YAML_INPUT_BYTES;
pub use parser::ParseError;
pub use parser::parse_document;
