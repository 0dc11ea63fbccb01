//! End-to-end snippet generation tests for refdoc-core.
//!
//! ## Purpose
//! Runs the full parse, redact, split, and render pipeline over a realistic
//! reference document and checks the properties readers of the generated
//! pages rely on.
//!
//! ## What is covered
//! - Top-level key order and placeholder shape in the overview.
//! - One section per settings entry, with verbatim and isolated bodies.
//! - Byte-stable output across runs.
//! - Graceful output when a container or its settings are missing.
// crates/refdoc-core/tests/pipeline.rs
// =============================================================================
// Module: Pipeline Integration Tests
// Description: Full builds over a realistic reference document.
// Purpose: Validate the observable properties of generated snippets.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use refdoc_core::EventKind;
use refdoc_core::NoopEventSink;
use refdoc_core::redact;
use refdoc_core::split;
use refdoc_yaml::Node;
use refdoc_yaml::parse_document;

type TestResult = Result<(), String>;

/// Returns the YAML between the first `yaml` fence pair of `text`.
fn fenced_yaml(text: &str) -> Result<&str, String> {
    let start = text.find("```yaml\n").ok_or("missing opening fence")? + "```yaml\n".len();
    let end = text[start ..].find("```").ok_or("missing closing fence")?;
    Ok(&text[start .. start + end])
}

fn parse_root(yaml: &str) -> Result<Node, String> {
    parse_document(yaml).map(|document| document.root().clone()).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Worked Example
// ============================================================================

#[test]
fn run_linters_version_example() -> TestResult {
    let reference = "\
run:
  timeout: 5m
linters:
  settings:
    nolintlint:
      allow-unused: false
    unused:
      field-writes-are-uses: true
version: \"2\"
";
    let snippets = common::builder().build(reference).map_err(|err| err.to_string())?;
    let overview = parse_root(fenced_yaml(&snippets.overview)?)?;
    if overview.keys() != ["run", "linters", "version"] {
        return Err(format!("unexpected overview keys: {}", overview.keys().join(", ")));
    }

    let linters = overview.get("linters").ok_or("linters missing")?;
    if linters.keys() != ["option"] || linters.children[0].comments.head
        != "# See the dedicated \"linters\" documentation section."
    {
        return Err("linters is not a commented placeholder".to_string());
    }

    let version_key = &overview.children[4];
    if version_key.comments.head != "# See the dedicated \"version\" documentation section." {
        return Err(format!("version key comment: {}", version_key.comments.head));
    }
    if overview.get("version").map(|value| value.value.as_str()) != Some("2") {
        return Err("version value not preserved".to_string());
    }

    if snippets.section_names("linters") != ["nolintlint", "unused"] {
        return Err("expected linters/nolintlint and linters/unused".to_string());
    }
    let unused = &snippets.sections["linters"][1].1;
    let section = parse_root(fenced_yaml(unused)?)?;
    if section.keys() != ["linters"] {
        return Err("section must nest under linters only".to_string());
    }
    let settings = section
        .get("linters")
        .and_then(|linters| linters.get("settings"))
        .ok_or("section must nest under linters.settings")?;
    if settings.keys() != ["unused"] {
        return Err("section must hold only its own component".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Overview Properties
// ============================================================================

#[test]
fn overview_preserves_documented_key_order() -> TestResult {
    let snippets = common::builder().build(common::REFERENCE).map_err(|err| err.to_string())?;
    let overview = parse_root(fenced_yaml(&snippets.overview)?)?;
    let expected = ["run", "output", "linters", "formatters", "issues", "severity", "version"];
    if overview.keys() != expected {
        return Err(format!("unexpected overview keys: {}", overview.keys().join(", ")));
    }
    Ok(())
}

#[test]
fn overview_values_are_placeholders() -> TestResult {
    let snippets = common::builder().build(common::REFERENCE).map_err(|err| err.to_string())?;
    let overview = parse_root(fenced_yaml(&snippets.overview)?)?;
    for (key, value) in overview.pairs() {
        if key.value == "version" {
            continue;
        }
        let shape_ok = value.is_mapping()
            && value.keys() == ["option"]
            && value.get("option").map(|option| option.value.as_str()) == Some("value");
        if !shape_ok {
            return Err(format!("`{}` is not a placeholder pair", key.value));
        }
    }
    if snippets.overview.contains("nolintlint") || snippets.overview.contains("G401") {
        return Err("overview leaks settings bodies".to_string());
    }
    Ok(())
}

#[test]
fn dropped_keys_are_reported() {
    let (builder, sink) = common::builder_with_sink();
    let snippets = builder.build(common::REFERENCE).unwrap();
    assert!(!snippets.overview.contains("plugins"));
    let dropped: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|event| event.event == EventKind::TopLevelKeyDropped)
        .collect();
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].key.as_deref(), Some("plugins"));
}

// ============================================================================
// SECTION: Section Properties
// ============================================================================

#[test]
fn every_settings_entry_yields_one_verbatim_section() {
    let document = parse_document(common::REFERENCE).unwrap();
    let redaction = redact(&document, false, &NoopEventSink).unwrap();
    let index = refdoc_core::DescriptionIndex::default();
    for container in ["linters", "formatters"] {
        let retained = redaction.retained(container).unwrap();
        let source_settings = retained.value.get("settings").unwrap();
        let result = split(&retained.key, &retained.value, &index, &NoopEventSink);
        let names: Vec<&str> = result.sections.iter().map(|section| section.name.as_str()).collect();
        assert_eq!(names, source_settings.keys());
        for section in &result.sections {
            assert_eq!(section.body(), source_settings.get(&section.name));
        }
    }
}

#[test]
fn sections_are_isolated() {
    let snippets = common::builder().build(common::REFERENCE).unwrap();
    let gosec = &snippets.sections["linters"][0].1;
    let nolintlint = &snippets.sections["linters"][1].1;
    assert!(gosec.contains("G401"));
    assert!(!gosec.contains("require-explanation"));
    assert!(!gosec.contains("field-writes-are-uses"));
    assert!(nolintlint.contains("require-explanation: true"));
    assert!(!nolintlint.contains("G401"));
    assert!(!nolintlint.contains("default: standard"));
}

#[test]
fn sections_carry_descriptions_and_back_links() {
    let snippets = common::builder().build(common::REFERENCE).unwrap();
    let gofmt = &snippets.sections["formatters"][0].1;
    let expected = "\
### gofmt

Checks if the code is formatted.

```yaml
formatters:
  settings:
    gofmt:
      # Simplify code.
      simplify: true
      rewrite-rules:
        - pattern: 'interface{}'
          replacement: 'any'
```

[<span title=\"Back to the top\"><FaArrowUp /></span>](#list-item-gofmt)


";
    assert_eq!(gofmt, expected);
}

#[test]
fn container_snippets_point_at_each_section() {
    let snippets = common::builder().build(common::REFERENCE).unwrap();
    let (_, linters) = snippets.key_snippets.iter().find(|(key, _)| key == "linters").unwrap();
    for name in ["gosec", "nolintlint", "unused"] {
        assert!(linters.contains(&format!("See the dedicated \"linters.{name}\" documentation section.")));
    }
    assert!(linters.contains("- nolintlint"));
    assert!(!linters.contains("G401"));
}

// ============================================================================
// SECTION: Stability and Degradation
// ============================================================================

#[test]
fn builds_are_byte_identical() {
    let builder = common::builder();
    let first = builder.build(common::REFERENCE).unwrap();
    let second = builder.build(common::REFERENCE).unwrap();
    assert_eq!(first.configuration_file(), second.configuration_file());
    assert_eq!(first.container_text("linters"), second.container_text("linters"));
    assert_eq!(first, second);
}

#[test]
fn missing_formatters_degrades_to_empty_sections() {
    let reference = "run:\n  timeout: 5m\nlinters:\n  settings:\n    gosec:\n      severity: low\n";
    let (builder, sink) = common::builder_with_sink();
    let snippets = builder.build(reference).unwrap();
    assert!(snippets.section_names("formatters").is_empty());
    assert_eq!(snippets.container_text("formatters"), "");
    assert_eq!(snippets.section_names("linters"), vec!["gosec"]);
    assert!(snippets.overview.starts_with("```yaml\nrun:\n"));
    assert_eq!(sink.count(EventKind::ContainerMissing), 1);
}

#[test]
fn container_without_settings_degrades_to_empty_sections() {
    let reference = "formatters:\n  enable:\n    - gofmt\n";
    let (builder, sink) = common::builder_with_sink();
    let snippets = builder.build(reference).unwrap();
    assert!(snippets.section_names("formatters").is_empty());
    assert_eq!(sink.count(EventKind::SettingsMissing), 1);
    assert_eq!(
        snippets.key_snippets[0].1,
        "### `formatters` configuration\n\n```yaml\nformatters:\n  enable:\n    - gofmt\n```\n\n"
    );
}
