// crates/refdoc-core/src/index.rs
// ============================================================================
// Module: Description Index
// Description: Component metadata records and the name-to-description index.
// Purpose: Resolve section descriptions from per-container metadata files.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each container has a metadata file (`<assets>/<container>-info.json`)
//! holding an array of [`ComponentRecord`] values. Internal records are
//! skipped; the rest are keyed by name with a display-ready description.
//! Deprecated components describe their deprecation instead of themselves.
//!
//! Metadata files are untrusted input and are size-capped before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted metadata file size in bytes.
pub const MAX_METADATA_BYTES: usize = 8 * 1024 * 1024;
/// Group name marking components enabled by default.
pub const STANDARD_GROUP: &str = "standard";

// ============================================================================
// SECTION: Records
// ============================================================================

/// Deprecation notice attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deprecation {
    /// Version that deprecated the component.
    #[serde(default)]
    pub since: String,
    /// Deprecation message.
    #[serde(default)]
    pub message: String,
    /// Replacement component, if any.
    #[serde(default)]
    pub replacement: String,
}

/// Metadata describing one linter or formatter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Component name, also the section key under `settings`.
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub desc: String,
    /// Group memberships (only the keys matter).
    #[serde(default)]
    pub groups: BTreeMap<String, Value>,
    /// Upstream repository URL.
    #[serde(default, rename = "originalURL")]
    pub original_url: String,
    /// Internal components are never documented.
    #[serde(default)]
    pub internal: bool,
    /// Whether the component can fix issues automatically.
    #[serde(default)]
    pub can_auto_fix: bool,
    /// Version that introduced the component.
    #[serde(default)]
    pub since: String,
    /// Deprecation notice, when deprecated.
    #[serde(default)]
    pub deprecation: Option<Deprecation>,
}

impl ComponentRecord {
    /// Returns true when the component carries a deprecation notice.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    /// Returns true when the component is enabled by default.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        self.groups.contains_key(STANDARD_GROUP)
    }
}

/// Errors raised while loading metadata files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// I/O failure while reading a metadata file.
    #[error("metadata io error: {0}")]
    Io(String),
    /// JSON decoding error.
    #[error("metadata json error: {0}")]
    Json(String),
    /// Metadata file exceeds [`MAX_METADATA_BYTES`].
    #[error("metadata file exceeds size limit: {0}")]
    TooLarge(String),
}

// ============================================================================
// SECTION: Descriptions
// ============================================================================

/// Returns the display description of a record.
///
/// Deprecated components use the deprecation message, followed by
/// ` Replaced by <name>.` when a replacement exists.
#[must_use]
pub fn describe(record: &ComponentRecord) -> String {
    let text = match &record.deprecation {
        Some(deprecation) if deprecation.replacement.is_empty() => deprecation.message.clone(),
        Some(deprecation) => {
            format!("{} Replaced by {}.", deprecation.message, deprecation.replacement)
        }
        None => record.desc.clone(),
    };
    format_description(&text)
}

/// Normalizes a description for Markdown output: first character uppercased,
/// trailing period ensured, newlines turned into `<br/>`.
///
/// Empty input stays empty.
#[must_use]
pub fn format_description(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().chain(chars).collect();
    if !out.ends_with('.') {
        out.push('.');
    }
    out.replace('\n', "<br/>")
}

// ============================================================================
// SECTION: Index
// ============================================================================

/// Name-to-description lookup for one container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescriptionIndex {
    /// Descriptions keyed by component name.
    entries: BTreeMap<String, String>,
}

impl DescriptionIndex {
    /// Builds an index from records, skipping internal components.
    #[must_use]
    pub fn from_records(records: &[ComponentRecord]) -> Self {
        let entries = records
            .iter()
            .filter(|record| !record.internal)
            .map(|record| (record.name.clone(), describe(record)))
            .collect();
        Self {
            entries,
        }
    }

    /// Returns the description for `name` when indexed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns the description for `name`, or an empty string on a miss.
    #[must_use]
    pub fn lookup(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Number of indexed components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Returns the metadata file path of `container` under `assets`.
#[must_use]
pub fn index_path(assets: &Path, container: &str) -> PathBuf {
    assets.join(format!("{container}-info.json"))
}

/// Reads a metadata file holding a JSON array of records.
///
/// # Errors
///
/// Returns [`IndexError`] when the file cannot be read, is too large, or is
/// not a valid record array.
pub fn load_records(path: &Path) -> Result<Vec<ComponentRecord>, IndexError> {
    let bytes = fs::read(path)
        .map_err(|err| IndexError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_METADATA_BYTES {
        return Err(IndexError::TooLarge(path.display().to_string()));
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| IndexError::Json(format!("{}: {err}", path.display())))
}
