// crates/refdoc-core/src/artifacts/tests.rs
// ============================================================================
// Module: Documentation Artifact Tests
// Description: Unit tests for artifact generation, writing, and drift checks.
// Purpose: Ensure the artifact set is complete and verification fails closed.
// Dependencies: refdoc-core, tempfile
// ============================================================================

//! ## Overview
//! Builds a small input tree on disk and exercises generate, write, and
//! verify against it.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use super::ArtifactError;
use super::CONFIGURATION_FILE;
use super::FORMATTERS_SETTINGS_FILE;
use super::LINTERS_DISABLED_FILE;
use super::LINTERS_ENABLED_FILE;
use super::LINTERS_SETTINGS_FILE;
use super::generate_artifacts;
use super::verify_artifacts;
use super::write_artifacts;
use crate::build::BuildError;
use crate::config::GeneratorConfig;
use crate::events::NoopEventSink;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const REFERENCE: &str = "\
linters:
  default: standard
  settings:
    gosec:
      severity: low
formatters:
  settings:
    gofmt:
      simplify: true
";

const LINTERS_INFO: &str = r#"[
  {"name": "gosec", "desc": "inspects source code for security problems", "since": "v1.0.0", "originalURL": "https://github.com/securego/gosec"},
  {"name": "errcheck", "desc": "checks unchecked errors", "since": "v1.0.0", "groups": {"standard": {}}},
  {"name": "gofmt", "desc": "checks whether code was gofmt-ed", "since": "v1.0.0"}
]"#;

fn config(root: &Path, with_linters_info: bool) -> GeneratorConfig {
    std::fs::write(root.join("reference.yml"), REFERENCE).unwrap();
    let assets = root.join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    if with_linters_info {
        std::fs::write(assets.join("linters-info.json"), LINTERS_INFO).unwrap();
    }
    GeneratorConfig {
        reference_path: root.join("reference.yml"),
        assets_path: assets,
        output_dir: root.join("out"),
        ..GeneratorConfig::default()
    }
}

fn file_names(artifacts: &[super::Artifact]) -> Vec<&str> {
    artifacts.iter().map(|artifact| artifact.file_name).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn full_artifact_set_includes_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), true);
    let artifacts = generate_artifacts(&config, Arc::new(NoopEventSink)).unwrap();
    assert_eq!(
        file_names(&artifacts),
        vec![
            CONFIGURATION_FILE,
            LINTERS_SETTINGS_FILE,
            FORMATTERS_SETTINGS_FILE,
            LINTERS_ENABLED_FILE,
            LINTERS_DISABLED_FILE
        ]
    );

    let settings = &artifacts[1].content;
    assert!(settings.contains("Inspects source code for security problems."));
    let disabled = &artifacts[4].content;
    assert!(disabled.contains("[gosec&nbsp;<FaCog size={'0.8rem'} />](#gosec \"gosec configuration\")"));
    assert!(disabled.ends_with("|\n"));
    let enabled = &artifacts[3].content;
    assert!(enabled.contains("[errcheck](#errcheck \"errcheck has no configuration\")"));
}

#[test]
fn table_links_components_configured_under_formatters() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), true);
    let artifacts = generate_artifacts(&config, Arc::new(NoopEventSink)).unwrap();
    let disabled = &artifacts[4].content;
    assert!(disabled.contains("[gofmt&nbsp;<FaCog size={'0.8rem'} />](#gofmt \"gofmt configuration\")"));
    assert!(!disabled.contains("gofmt has no configuration"));
}

#[test]
fn tables_are_skipped_without_linter_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), false);
    let artifacts = generate_artifacts(&config, Arc::new(NoopEventSink)).unwrap();
    assert_eq!(
        file_names(&artifacts),
        vec![CONFIGURATION_FILE, LINTERS_SETTINGS_FILE, FORMATTERS_SETTINGS_FILE]
    );
    assert!(artifacts[2].content.starts_with("### gofmt\n\n```yaml\nformatters:\n"));
}

#[test]
fn written_artifacts_verify_and_drift_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), true);
    let artifacts = generate_artifacts(&config, Arc::new(NoopEventSink)).unwrap();
    write_artifacts(&config.output_dir, &artifacts).unwrap();
    verify_artifacts(&config.output_dir, &artifacts).unwrap();

    let edited = config.output_dir.join(LINTERS_SETTINGS_FILE);
    std::fs::write(&edited, "stale\n").unwrap();
    let err = verify_artifacts(&config.output_dir, &artifacts).unwrap_err();
    assert!(matches!(err, ArtifactError::Drift(message) if message.ends_with(LINTERS_SETTINGS_FILE)));

    std::fs::remove_file(config.output_dir.join(CONFIGURATION_FILE)).unwrap();
    let err = verify_artifacts(&config.output_dir, &artifacts).unwrap_err();
    assert!(matches!(err, ArtifactError::Io(_)));
}

#[test]
fn missing_reference_is_a_build_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), false);
    config.reference_path = dir.path().join("absent.yml");
    let err = generate_artifacts(&config, Arc::new(NoopEventSink)).unwrap_err();
    assert!(matches!(err, ArtifactError::Build(BuildError::Io(_))));
}
