// crates/refdoc-core/src/catalog.rs
// ============================================================================
// Module: Component Catalog
// Description: Settings registry and component list tables.
// Purpose: Render the enabled/disabled component tables that sections link to.
// Dependencies: crate::index
// ============================================================================

//! ## Overview
//! The [`SettingsRegistry`] records which components have a settings section,
//! built from the section names actually extracted from the reference
//! document. [`component_table_markdown`] renders the Markdown table listing
//! components; each row carries the anchor that section back-links target and
//! links to the component's settings section when one exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::index::ComponentRecord;
use crate::index::describe;

// ============================================================================
// SECTION: Settings Registry
// ============================================================================

/// Component names that have a settings section, compared ASCII
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsRegistry {
    /// Lowercased component names.
    names: BTreeSet<String>,
}

impl SettingsRegistry {
    /// Builds a registry from section names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for name in names {
            registry.insert(name.as_ref());
        }
        registry
    }

    /// Registers a section name.
    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_ascii_lowercase());
    }

    /// Returns true when `name` has a settings section.
    #[must_use]
    pub fn has_settings(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when no name is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Renders the component table.
///
/// `enabled` selects components in the standard group; otherwise the rest.
/// Internal components are excluded. Rows are sorted by name with deprecated
/// components last. Lines are joined without a trailing newline.
#[must_use]
pub fn component_table_markdown(
    records: &[ComponentRecord],
    enabled: bool,
    registry: &SettingsRegistry,
    prefix: &str,
) -> String {
    let mut selected: Vec<&ComponentRecord> = records
        .iter()
        .filter(|record| !record.internal && record.is_standard() == enabled)
        .collect();
    selected.sort_by(|left, right| {
        left.is_deprecated()
            .cmp(&right.is_deprecated())
            .then_with(|| left.name.cmp(&right.name))
    });

    let mut lines = vec![
        "|Name|Description|AutoFix|Since|".to_string(),
        "|----|-----------|-------|-----|".to_string(),
    ];
    for record in selected {
        let auto_fix =
            if record.can_auto_fix { span("Auto fix supported", "✔") } else { String::new() };
        lines.push(format!(
            "|{}|{}|{}|{}|",
            name_cell(record, registry, prefix),
            describe(record),
            auto_fix,
            record.since
        ));
    }
    lines.join("\n")
}

/// Renders the name cell: anchor, settings link, repository link, and
/// deprecation marker.
fn name_cell(record: &ComponentRecord, registry: &SettingsRegistry, prefix: &str) -> String {
    let name = record.name.as_str();
    let mut cell = span_with_id(&format!("{prefix}{name}"), "", "");

    if registry.has_settings(name) && !record.is_deprecated() {
        cell.push_str(&format!(
            "[{name}&nbsp;<FaCog size={{'0.8rem'}} />](#{name} \"{name} configuration\")"
        ));
    } else {
        cell.push_str(&span_with_id(name, "", ""));
        cell.push_str(&format!("[{name}](#{name} \"{name} has no configuration\")"));
    }

    if !record.original_url.is_empty() {
        let icon = if record.original_url.contains("gitlab") {
            "<FaGitlab size={'0.8rem'} />"
        } else {
            "<FaGithub size={'0.8rem'} />"
        };
        cell.push_str(&format!(
            "&nbsp;[{}]({})",
            span(&format!("{name} repository"), icon),
            record.original_url
        ));
    }

    if let Some(deprecation) = &record.deprecation {
        let title = if deprecation.replacement.is_empty() {
            "deprecated".to_string()
        } else {
            format!("deprecated since {}", deprecation.since)
        };
        cell.push_str("&nbsp;");
        cell.push_str(&span(&title, "⚠"));
    }
    cell
}

/// Renders `<span title="..">icon</span>`.
fn span(title: &str, icon: &str) -> String {
    format!("<span title=\"{title}\">{icon}</span>")
}

/// Renders `<span id=".." title="..">icon</span>`.
fn span_with_id(id: &str, title: &str, icon: &str) -> String {
    format!("<span id=\"{id}\" title=\"{title}\">{icon}</span>")
}
