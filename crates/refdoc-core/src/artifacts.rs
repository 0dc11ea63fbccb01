// crates/refdoc-core/src/artifacts.rs
// ============================================================================
// Module: Documentation Artifacts
// Description: Generates, writes, and verifies the Markdown artifact set.
// Purpose: Keep generated reference docs in sync with the reference document.
// Dependencies: crate::{build, catalog, config, events, index}, thiserror
// ============================================================================

//! ## Overview
//! One generation run produces the configuration file page, one settings page
//! per container, and, when linter metadata is available, the enabled and
//! disabled linter tables. Output is deterministic: [`verify_artifacts`]
//! regenerates in memory and reports drift against files on disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::build::BuildError;
use crate::build::SnippetBuilder;
use crate::build::load_catalog;
use crate::build::read_reference;
use crate::catalog::component_table_markdown;
use crate::config::GeneratorConfig;
use crate::events::EventSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Overview plus key snippets.
pub const CONFIGURATION_FILE: &str = "configuration-file.md";
/// Linter settings sections.
pub const LINTERS_SETTINGS_FILE: &str = "linters-settings.md";
/// Formatter settings sections.
pub const FORMATTERS_SETTINGS_FILE: &str = "formatters-settings.md";
/// Table of linters enabled by default.
pub const LINTERS_ENABLED_FILE: &str = "linters-enabled.md";
/// Table of linters disabled by default.
pub const LINTERS_DISABLED_FILE: &str = "linters-disabled.md";
/// Container whose metadata drives the component tables.
const TABLE_CONTAINER: &str = "linters";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the output directory.
    pub file_name: &'static str,
    /// File content.
    pub content: String,
}

/// Errors raised when generating, writing, or verifying artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Snippet generation failed.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// IO failure while writing or reading artifacts.
    #[error("artifact io error: {0}")]
    Io(String),
    /// Generated artifacts do not match the files on disk.
    #[error("artifact drift: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Generates the artifact set from the inputs named by `config`.
///
/// # Errors
///
/// Returns [`ArtifactError::Build`] when inputs cannot be read or the build
/// fails.
pub fn generate_artifacts(
    config: &GeneratorConfig,
    sink: Arc<dyn EventSink>,
) -> Result<Vec<Artifact>, ArtifactError> {
    let catalog = load_catalog(&config.assets_path, sink.as_ref())?;
    let raw = read_reference(&config.reference_path)?;
    let snippets = SnippetBuilder::from_catalog(&catalog)
        .with_sink(sink)
        .strict_keys(config.strict_keys)
        .list_item_prefix(config.list_item_prefix.as_str())
        .build(&raw)?;

    let mut artifacts = vec![
        Artifact {
            file_name: CONFIGURATION_FILE,
            content: snippets.configuration_file(),
        },
        Artifact {
            file_name: LINTERS_SETTINGS_FILE,
            content: snippets.container_text("linters"),
        },
        Artifact {
            file_name: FORMATTERS_SETTINGS_FILE,
            content: snippets.container_text("formatters"),
        },
    ];

    if let Some(records) = catalog.get(TABLE_CONTAINER)
        && !records.is_empty()
    {
        let registry = snippets.settings_registry();
        for (file_name, enabled) in [(LINTERS_ENABLED_FILE, true), (LINTERS_DISABLED_FILE, false)] {
            let mut content =
                component_table_markdown(records, enabled, &registry, &config.list_item_prefix);
            content.push('\n');
            artifacts.push(Artifact {
                file_name,
                content,
            });
        }
    }
    Ok(artifacts)
}

/// Writes artifacts into `dir`, creating it when absent.
///
/// # Errors
///
/// Returns [`ArtifactError::Io`] when file output fails.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<(), ArtifactError> {
    fs::create_dir_all(dir).map_err(|err| ArtifactError::Io(format!("{}: {err}", dir.display())))?;
    for artifact in artifacts {
        let path = dir.join(artifact.file_name);
        fs::write(&path, artifact.content.as_bytes())
            .map_err(|err| ArtifactError::Io(format!("{}: {err}", path.display())))?;
    }
    Ok(())
}

/// Verifies the files in `dir` match the generated artifacts.
///
/// # Errors
///
/// Returns [`ArtifactError::Drift`] for the first mismatching file and
/// [`ArtifactError::Io`] when a file cannot be read.
pub fn verify_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<(), ArtifactError> {
    for artifact in artifacts {
        let path = dir.join(artifact.file_name);
        let existing = fs::read_to_string(&path)
            .map_err(|err| ArtifactError::Io(format!("{}: {err}", path.display())))?;
        if existing != artifact.content {
            return Err(ArtifactError::Drift(format!("docs mismatch: {}", path.display())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
