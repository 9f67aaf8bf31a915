//! # Core Data Models for Snapshots
//!
//! This module defines the types shared by every part of the snapshot
//! subsystem: detected changes, the errors raised while taking a snapshot
//! apart, and the errors a schema engine may report.
//!
//! ## Identity of a Change
//!
//! A [`ChangeEntry`] is identified by its `(kind, description)` pair. The run
//! label records *when* the change was first seen and is deliberately not part
//! of the identity, so a change rediscovered on a later run is recognised as
//! the same change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SHA-256 digest size in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; HASH_SIZE];

/// Line separator written into snapshot files.
///
/// Parsing accepts both `\n` and `\r\n` regardless of platform.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Line separator written into snapshot files.
///
/// Parsing accepts both `\n` and `\r\n` regardless of platform.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// One detected schema change.
///
/// Used both for breaking changes (which end up in the change log) and for
/// dangerous changes (which are only reported).
///
/// # Example
///
/// ```rust
/// use schemaguard_snapshot::ChangeEntry;
///
/// let entry = ChangeEntry::new("FieldRemoved", "field X removed\nfrom type Y");
/// assert_eq!(entry.description, "field X removed from type Y");
/// assert!(entry.run.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Category of the change (e.g. `ToolRemoved`). A single token.
    pub kind: String,

    /// Human-readable description, always a single line.
    pub description: String,

    /// Label of the run that first recorded this change, if recorded.
    pub run: Option<String>,
}

impl ChangeEntry {
    /// Creates an unrecorded entry.
    ///
    /// Whitespace and `:` are stripped from `kind` and runs of whitespace in
    /// `description` collapse to single spaces, so every entry renders as
    /// exactly one change-log line and reads back unchanged.
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: normalize_kind(&kind.into()),
            description: normalize_description(&description.into()),
            run: None,
        }
    }

    /// Returns this entry with `kind` and `description` in the form
    /// [`ChangeEntry::new`] produces. The run label is kept.
    pub fn normalized(self) -> Self {
        Self {
            run: self.run,
            ..Self::new(self.kind, self.description)
        }
    }

    /// Returns this entry tagged with the run that recorded it.
    pub fn recorded_in(mut self, run: impl Into<String>) -> Self {
        self.run = Some(run.into());
        self
    }

    /// The `(kind, description)` identity used for deduplication.
    ///
    /// Computed on the normalized fields, so an entry built field by field
    /// has the same identity it will have once written and parsed back.
    pub fn identity(&self) -> (String, String) {
        (
            normalize_kind(&self.kind),
            normalize_description(&self.description),
        )
    }
}

fn normalize_kind(kind: &str) -> String {
    kind.chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect()
}

fn normalize_description(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl std::fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.description)
    }
}

/// Errors raised while taking a snapshot apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// A change-log line could not be understood.
    #[error("Malformed change log at line {line}: {content:?}")]
    MalformedChangeLog {
        /// 1-based line number within the change-log block.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The snapshot has a header but no schema text after it.
    #[error("Snapshot has no schema region")]
    MissingSchemaRegion,
}

/// Errors a [`SchemaEngine`](crate::SchemaEngine) may report.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema text is not a valid schema.
    #[error("Schema parse error: {0}")]
    Parse(String),

    /// Two definitions share a name.
    #[error("Duplicate definition: {0}")]
    DuplicateTool(String),

    /// The schema text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_kind_and_description() {
        let entry = ChangeEntry::new(" Field Removed: ", "  field x\r\n  gone ");
        assert_eq!(entry.kind, "FieldRemoved");
        assert_eq!(entry.description, "field x gone");
    }

    #[test]
    fn test_identity_ignores_run() {
        let a = ChangeEntry::new("ToolRemoved", "tool `a` removed").recorded_in("2026-01-01");
        let b = ChangeEntry::new("ToolRemoved", "tool `a` removed").recorded_in("2026-02-01");
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_of_hand_built_entry_is_normalized() {
        let hand_built = ChangeEntry {
            kind: "Field Removed".to_string(),
            description: "field X  removed".to_string(),
            run: Some("r1".to_string()),
        };
        assert_eq!(
            hand_built.identity(),
            ChangeEntry::new("FieldRemoved", "field X removed").identity()
        );

        let normalized = hand_built.normalized();
        assert_eq!(normalized.description, "field X removed");
        assert_eq!(normalized.run.as_deref(), Some("r1"));
    }

    #[test]
    fn test_display() {
        let entry = ChangeEntry::new("ToolRemoved", "tool `a` removed");
        assert_eq!(entry.to_string(), "ToolRemoved: tool `a` removed");
    }
}
