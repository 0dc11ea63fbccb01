// crates/refdoc-core/tests/common/mod.rs
// =============================================================================
// Module: Generator Test Helpers
// Description: Shared fixtures and sinks for refdoc-core integration tests.
// Purpose: Reduce duplication across integration suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use refdoc_core::ComponentRecord;
use refdoc_core::DescriptionIndex;
use refdoc_core::EventKind;
use refdoc_core::EventSink;
use refdoc_core::GenerationEvent;
use refdoc_core::SnippetBuilder;

/// Reference document shaped like a real linter configuration reference.
pub const REFERENCE: &str = "\
# Options for analysis running.
run:
  # Timeout for total work.
  # Default: 0 (disabled)
  timeout: 5m
  # Include test files or not.
  tests: false

# Output configuration options.
output:
  formats:
    text:
      path: stdout

linters:
  # Default set of linters.
  default: standard
  enable:
    - gosec
    - nolintlint
  settings:
    gosec:
      # To select a subset of rules to run.
      includes:
        - G401
        - G306
      severity: low
    nolintlint:
      # Disable to ensure that all nolint directives actually have an effect.
      allow-unused: false
      require-explanation: true
    unused:
      field-writes-are-uses: true

formatters:
  enable:
    - gofmt
  settings:
    gofmt:
      # Simplify code.
      simplify: true
      rewrite-rules:
        - pattern: 'interface{}'
          replacement: 'any'

issues:
  max-issues-per-linter: 50

severity:
  default: error

plugins:
  custom: {}

version: \"2\"
";

/// Event sink collecting events in memory.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<GenerationEvent>>,
}

impl CollectingSink {
    /// Returns the recorded events.
    pub fn events(&self) -> Vec<GenerationEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Counts recorded events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|event| event.event == kind).count()
    }
}

impl EventSink for CollectingSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Returns a component record with a description.
pub fn record(name: &str, desc: &str) -> ComponentRecord {
    ComponentRecord {
        name: name.to_string(),
        desc: desc.to_string(),
        since: "v1.0.0".to_string(),
        ..ComponentRecord::default()
    }
}

/// Returns a builder indexing descriptions for the fixture's components.
pub fn builder() -> SnippetBuilder {
    let mut indexes = BTreeMap::new();
    indexes.insert(
        "linters".to_string(),
        DescriptionIndex::from_records(&[
            record("gosec", "inspects source code for security problems"),
            record("nolintlint", "reports ill-formed or insufficient nolint directives"),
            record("unused", "checks Go code for unused constants, variables, functions and types"),
        ]),
    );
    indexes.insert(
        "formatters".to_string(),
        DescriptionIndex::from_records(&[record("gofmt", "checks if the code is formatted")]),
    );
    SnippetBuilder::new(indexes)
}

/// Returns a builder recording events into a fresh sink.
pub fn builder_with_sink() -> (SnippetBuilder, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    (builder().with_sink(sink.clone()), sink)
}
