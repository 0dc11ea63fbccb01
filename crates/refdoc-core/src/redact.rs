// crates/refdoc-core/src/redact.rs
// ============================================================================
// Module: Redactor
// Description: Builds the overview tree from the reference document root.
// Purpose: Keep top-level shape while replacing verbose bodies.
// Dependencies: crate::policy, crate::events, refdoc-yaml
// ============================================================================

//! ## Overview
//! The redactor walks the root mapping's top-level pairs in source order and
//! applies the [`KeyPolicy`] table: placeholder keys get a two-entry
//! `option`/`value` stand-in, `version` keeps its value under a commented key
//! copy, and unlisted keys are dropped (or rejected in strict mode).
//!
//! The parsed tree is never modified. The overview is assembled from header
//! copies and clones, and every listed key is also returned with a copy of
//! its original value for snippet rendering and section splitting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use refdoc_yaml::Node;

use crate::build::BuildError;
use crate::events::EventKind;
use crate::events::EventSink;
use crate::events::GenerationEvent;
use crate::policy::KeyPolicy;
use crate::policy::header_copy;
use crate::policy::placeholder;
use crate::policy::pointer_comment;
use crate::policy::policy_for;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A documented top-level entry with its original value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedKey {
    /// Copy of the source key node.
    pub key: Node,
    /// Copy of the source value subtree.
    pub value: Node,
    /// Policy applied in the overview.
    pub policy: KeyPolicy,
}

/// Output of [`redact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    /// Overview mapping with placeholders in place of verbose bodies.
    pub overview: Node,
    /// Documented entries in source order.
    pub retained: Vec<RetainedKey>,
}

impl Redaction {
    /// Returns the retained entry for `key`.
    #[must_use]
    pub fn retained(&self, key: &str) -> Option<&RetainedKey> {
        self.retained.iter().find(|entry| entry.key.value == key)
    }
}

// ============================================================================
// SECTION: Redaction
// ============================================================================

/// Builds the overview of a parsed reference document.
///
/// `root` may be a document node or its root mapping.
///
/// # Errors
///
/// Returns [`BuildError::RootShape`] when the root is not a mapping, and
/// [`BuildError::UnlistedKey`] for an undocumented top-level key when
/// `strict_keys` is set.
pub fn redact(root: &Node, strict_keys: bool, sink: &dyn EventSink) -> Result<Redaction, BuildError> {
    let mapping = root.root();
    if !mapping.is_mapping() {
        return Err(BuildError::RootShape(mapping.kind.as_str().to_string()));
    }

    let mut overview = mapping.detached();
    let mut retained = Vec::new();
    for (key, value) in mapping.pairs() {
        let name = key.value.as_str();
        let policy = if key.is_scalar() { policy_for(name) } else { KeyPolicy::Drop };
        match policy {
            KeyPolicy::Drop => {
                if strict_keys {
                    return Err(BuildError::UnlistedKey(name.to_string()));
                }
                sink.record(
                    &GenerationEvent::new(EventKind::TopLevelKeyDropped)
                        .with_key(name)
                        .with_detail("key is not in the documented key list"),
                );
                continue;
            }
            KeyPolicy::EmbedWithComment => {
                let pointer = header_copy(key, name).with_head_comment(pointer_comment(name));
                overview.children.push(pointer);
                overview.children.push(value.clone());
            }
            KeyPolicy::Placeholder => {
                overview.children.push(key.clone());
                overview.children.push(placeholder(key, name));
            }
        }
        retained.push(RetainedKey {
            key: key.clone(),
            value: value.clone(),
            policy,
        });
    }

    Ok(Redaction {
        overview,
        retained,
    })
}
