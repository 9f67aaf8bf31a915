//! Error types for the snapshot guard.

use crate::outcome::Outcome;
use schemaguard_snapshot::{ChangeEntry, SchemaError, SnapshotError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a guard run.
#[derive(Debug, Error)]
pub enum GuardError {
    /// No snapshot exists yet. Handled internally as a first run.
    #[error("Snapshot not found: {}", path.display())]
    MissingSnapshot {
        /// Where the snapshot was expected.
        path: PathBuf,
    },

    /// The snapshot signature does not match its content.
    #[error(
        "Manual changes of the schema snapshot detected at {}. Do not edit it by hand; it is generated.",
        path.display()
    )]
    TamperedSnapshot {
        /// The rejected snapshot.
        path: PathBuf,
    },

    /// Breaking changes were found and configuration does not allow them.
    #[error("{} breaking change(s) detected and breaking changes are not allowed", changes.len())]
    BreakingChangesBlocked {
        /// Every breaking change found.
        changes: Vec<ChangeEntry>,
    },

    /// A read or write failed for a reason other than a missing file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot structure error passthrough.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Schema engine error passthrough.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GuardError {
    /// The run outcome this error stands for, if it is one of the policy
    /// failures rather than an unexpected error.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::TamperedSnapshot { .. } => Some(Outcome::TamperedDetected),
            Self::BreakingChangesBlocked { .. } => Some(Outcome::BreakingChangesBlocked),
            _ => None,
        }
    }
}
