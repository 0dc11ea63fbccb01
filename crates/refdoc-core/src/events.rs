// crates/refdoc-core/src/events.rs
// ============================================================================
// Module: Generation Events
// Description: Structured events emitted while building documentation.
// Purpose: Surface silent degradations (drops, misses) without failing.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Conditions that do not abort a build (an undocumented top-level key, a
//! container without `settings`, a section without a description) are
//! recorded as [`GenerationEvent`] values on an [`EventSink`]. Sinks write
//! JSON lines so the output can be grepped or shipped as-is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A top-level key outside the policy table was left out.
    TopLevelKeyDropped,
    /// A container key is absent from the reference document.
    ContainerMissing,
    /// A container has no usable `settings` mapping.
    SettingsMissing,
    /// A section name has no entry in the description index.
    DescriptionMissing,
    /// A container's metadata file does not exist.
    IndexMissing,
    /// A section document was extracted.
    SectionExtracted,
    /// A build finished successfully.
    BuildComplete,
}

/// Generation event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationEvent {
    /// Event identifier.
    pub event: EventKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Container key when relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Section name when relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Top-level key when relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Free-form detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl GenerationEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: EventKind) -> Self {
        Self {
            event,
            timestamp_ms: now_ms(),
            container: None,
            section: None,
            key: None,
            detail: None,
        }
    }

    /// Sets the container key.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Sets the section name.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Sets the top-level key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for generation events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &GenerationEvent);
}

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log in append mode, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &GenerationEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &GenerationEvent) {}
}
