// crates/refdoc-core/src/build.rs
// ============================================================================
// Module: Snippet Orchestrator
// Description: Parses, redacts, splits, and renders a reference document.
// Purpose: Produce the overview and section texts in one all-or-nothing pass.
// Dependencies: crate::{redact, split, render, index, catalog, config, events}
// ============================================================================

//! ## Overview
//! [`SnippetBuilder::build`] turns the raw reference document into
//! [`Snippets`]: the overview, one snippet per documented top-level key, and
//! the rendered settings sections of each container. The transformation is
//! pure and in-memory; reading the document and metadata files happens only
//! in [`build_from_paths`] and [`load_catalog`].
//!
//! Any parse or render failure aborts the build. Missing containers,
//! settings, metadata files, and descriptions degrade to empty output and are
//! recorded as events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use refdoc_yaml::ParseError;
use refdoc_yaml::parse_document;
use thiserror::Error;

use crate::catalog::SettingsRegistry;
use crate::config::GeneratorConfig;
use crate::events::EventKind;
use crate::events::EventSink;
use crate::events::GenerationEvent;
use crate::events::NoopEventSink;
use crate::index::ComponentRecord;
use crate::index::DescriptionIndex;
use crate::index::IndexError;
use crate::index::index_path;
use crate::index::load_records;
use crate::policy::CONTAINER_KEYS;
use crate::policy::is_container;
use crate::redact::redact;
use crate::render::RenderError;
use crate::render::render;
use crate::render::render_key_snippet;
use crate::render::render_section;
use crate::split::split;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted reference document size in bytes.
pub const MAX_REFERENCE_BYTES: usize = 4 * 1024 * 1024;
/// Default anchor prefix of component table rows.
pub const DEFAULT_LIST_ITEM_PREFIX: &str = "list-item-";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal build errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// I/O failure while reading the reference document.
    #[error("reference io error: {0}")]
    Io(String),
    /// The reference document is not well-formed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The document root is not a mapping.
    #[error("reference root must be a mapping, found {0}")]
    RootShape(String),
    /// Undocumented top-level key under strict key checking.
    #[error("top-level key `{0}` is not in the documented key list")]
    UnlistedKey(String),
    /// A synthesized tree could not be emitted.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A metadata file could not be loaded.
    #[error(transparent)]
    Index(#[from] IndexError),
}

// ============================================================================
// SECTION: Snippets
// ============================================================================

/// Rendered output of one build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippets {
    /// Overview snippet with every verbose body redacted.
    pub overview: String,
    /// Per-key snippets `(key, text)` in source order.
    pub key_snippets: Vec<(String, String)>,
    /// Section texts `(name, text)` per container, in source order.
    pub sections: BTreeMap<String, Vec<(String, String)>>,
}

impl Snippets {
    /// Returns the configuration file page: overview followed by key snippets.
    #[must_use]
    pub fn configuration_file(&self) -> String {
        let mut out = self.overview.clone();
        for (_, text) in &self.key_snippets {
            out.push_str(text);
        }
        out
    }

    /// Returns the concatenated section texts of `container`.
    #[must_use]
    pub fn container_text(&self, container: &str) -> String {
        self.sections
            .get(container)
            .map(|sections| sections.iter().map(|(_, text)| text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Returns the section names of `container`.
    #[must_use]
    pub fn section_names(&self, container: &str) -> Vec<&str> {
        self.sections
            .get(container)
            .map(|sections| sections.iter().map(|(name, _)| name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Returns the registry of components with a settings section in any
    /// container, so formatters listed among linters still link to their
    /// configuration.
    #[must_use]
    pub fn settings_registry(&self) -> SettingsRegistry {
        SettingsRegistry::from_names(self.sections.values().flatten().map(|(name, _)| name))
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds [`Snippets`] from reference document text.
#[derive(Clone)]
pub struct SnippetBuilder {
    /// Description index per container.
    indexes: BTreeMap<String, DescriptionIndex>,
    /// Destination of generation events.
    sink: Arc<dyn EventSink>,
    /// Reject undocumented top-level keys.
    strict_keys: bool,
    /// Anchor prefix used by section back links.
    list_item_prefix: String,
}

impl SnippetBuilder {
    /// Creates a builder with the given description indexes.
    #[must_use]
    pub fn new(indexes: BTreeMap<String, DescriptionIndex>) -> Self {
        Self {
            indexes,
            sink: Arc::new(NoopEventSink),
            strict_keys: false,
            list_item_prefix: DEFAULT_LIST_ITEM_PREFIX.to_string(),
        }
    }

    /// Creates a builder indexing the given per-container records.
    #[must_use]
    pub fn from_catalog(catalog: &BTreeMap<String, Vec<ComponentRecord>>) -> Self {
        let indexes = catalog
            .iter()
            .map(|(container, records)| (container.clone(), DescriptionIndex::from_records(records)))
            .collect();
        Self::new(indexes)
    }

    /// Routes generation events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Enables or disables strict top-level key checking.
    #[must_use]
    pub const fn strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    /// Sets the anchor prefix used by section back links.
    #[must_use]
    pub fn list_item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.list_item_prefix = prefix.into();
        self
    }

    /// Builds all snippets from reference document text.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the document does not parse, its root is
    /// not a mapping, a key is rejected under strict checking, or rendering
    /// fails.
    pub fn build(&self, raw: &str) -> Result<Snippets, BuildError> {
        let sink = self.sink.as_ref();
        let document = parse_document(raw)?;
        let frame = document.root();
        let redaction = redact(&document, self.strict_keys, sink)?;

        let mut snippets = Snippets {
            overview: render(&redaction.overview, None)?,
            ..Snippets::default()
        };
        for container in CONTAINER_KEYS {
            snippets.sections.insert(container.to_string(), Vec::new());
        }

        let empty_index = DescriptionIndex::default();
        for retained in &redaction.retained {
            let name = retained.key.value.as_str();
            let mut value = Cow::Borrowed(&retained.value);
            if is_container(name) {
                let index = self.indexes.get(name).unwrap_or(&empty_index);
                let result = split(&retained.key, &retained.value, index, sink);
                let mut texts = Vec::with_capacity(result.sections.len());
                for section in &result.sections {
                    texts.push((section.name.clone(), render_section(section, &self.list_item_prefix)?));
                    sink.record(
                        &GenerationEvent::new(EventKind::SectionExtracted)
                            .with_container(name)
                            .with_section(section.name.as_str()),
                    );
                }
                snippets.sections.insert(name.to_string(), texts);
                value = Cow::Owned(result.redacted_container);
            }
            let text = render_key_snippet(frame, &retained.key, &value)?;
            snippets.key_snippets.push((name.to_string(), text));
        }

        for container in CONTAINER_KEYS {
            if redaction.retained(container).is_none() {
                sink.record(
                    &GenerationEvent::new(EventKind::ContainerMissing).with_container(container),
                );
            }
        }

        let section_count: usize = snippets.sections.values().map(Vec::len).sum();
        sink.record(&GenerationEvent::new(EventKind::BuildComplete).with_detail(format!(
            "{} keys, {section_count} sections",
            snippets.key_snippets.len()
        )));
        Ok(snippets)
    }
}

// ============================================================================
// SECTION: File Inputs
// ============================================================================

/// Reads the reference document with size and encoding checks.
///
/// # Errors
///
/// Returns [`BuildError::Io`] when the file cannot be read, exceeds
/// [`MAX_REFERENCE_BYTES`], or is not UTF-8.
pub fn read_reference(path: &Path) -> Result<String, BuildError> {
    let bytes = fs::read(path).map_err(|err| BuildError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_REFERENCE_BYTES {
        return Err(BuildError::Io(format!(
            "reference file exceeds size limit: {}",
            path.display()
        )));
    }
    String::from_utf8(bytes)
        .map_err(|_| BuildError::Io(format!("reference file must be utf-8: {}", path.display())))
}

/// Loads the metadata records of every container under `assets`.
///
/// A missing metadata file yields an empty record list and an
/// `index_missing` event.
///
/// # Errors
///
/// Returns [`BuildError::Index`] when an existing file cannot be loaded.
pub fn load_catalog(
    assets: &Path,
    sink: &dyn EventSink,
) -> Result<BTreeMap<String, Vec<ComponentRecord>>, BuildError> {
    let mut catalog = BTreeMap::new();
    for container in CONTAINER_KEYS {
        let path = index_path(assets, container);
        let records = if path.is_file() {
            load_records(&path)?
        } else {
            sink.record(
                &GenerationEvent::new(EventKind::IndexMissing)
                    .with_container(container)
                    .with_detail(path.display().to_string()),
            );
            Vec::new()
        };
        catalog.insert(container.to_string(), records);
    }
    Ok(catalog)
}

/// Builds snippets from the files named by `config`.
///
/// # Errors
///
/// Returns [`BuildError`] when an input cannot be read or the build fails.
pub fn build_from_paths(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
) -> Result<Snippets, BuildError> {
    let catalog = load_catalog(&config.assets_path, sink.as_ref())?;
    let raw = read_reference(&config.reference_path)?;
    SnippetBuilder::from_catalog(&catalog)
        .with_sink(sink)
        .strict_keys(config.strict_keys)
        .list_item_prefix(config.list_item_prefix.as_str())
        .build(&raw)
}
