// crates/refdoc-core/src/lib.rs
// ============================================================================
// Module: refdoc Core Library
// Description: Reference configuration redaction and snippet extraction.
// Purpose: Turn one annotated reference document into navigable doc pages.
// Dependencies: refdoc-yaml, serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! `refdoc-core` reads an annotated reference configuration document and
//! produces a redacted overview plus one standalone snippet per component
//! settings section, each with a description from component metadata.
//! Top-level keys are handled by a closed policy table; the parsed tree is
//! never mutated and every derived tree is built from copies.
//!
//! Inputs are untrusted: the reference document, metadata files, and config
//! file are all size-capped before parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifacts;
pub mod build;
pub mod catalog;
pub mod config;
pub mod events;
pub mod index;
pub mod policy;
pub mod redact;
pub mod render;
pub mod split;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use artifacts::Artifact;
pub use artifacts::ArtifactError;
pub use artifacts::generate_artifacts;
pub use artifacts::verify_artifacts;
pub use artifacts::write_artifacts;
pub use build::BuildError;
pub use build::MAX_REFERENCE_BYTES;
pub use build::SnippetBuilder;
pub use build::Snippets;
pub use build::build_from_paths;
pub use build::load_catalog;
pub use build::read_reference;
pub use catalog::SettingsRegistry;
pub use catalog::component_table_markdown;
pub use config::ConfigError;
pub use config::EventSinkKind;
pub use config::EventsConfig;
pub use config::GeneratorConfig;
pub use events::EventKind;
pub use events::EventSink;
pub use events::FileEventSink;
pub use events::GenerationEvent;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use index::ComponentRecord;
pub use index::Deprecation;
pub use index::DescriptionIndex;
pub use index::IndexError;
pub use policy::KeyPolicy;
pub use redact::Redaction;
pub use redact::RetainedKey;
pub use redact::redact;
pub use render::RenderError;
pub use render::render;
pub use render::render_key_snippet;
pub use render::render_section;
pub use split::Section;
pub use split::SplitResult;
pub use split::split;
