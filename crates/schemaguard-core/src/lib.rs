//! # Schemaguard Core
//!
//! Backward-compatibility guard for API schemas. Compares the current schema
//! against a committed, signed snapshot, refuses unapproved breaking
//! changes, and keeps the snapshot (and the breaking-change log embedded in
//! it) up to date.
//!
//! ## Outcomes
//!
//! | Outcome | Written | Exit |
//! |---------|---------|------|
//! | `FirstRun` | yes | 1 |
//! | `Unchanged` | no | 0 |
//! | `TamperedDetected` | no | 1 |
//! | `BreakingChangesBlocked` | no | 1 |
//! | `BreakingChangesAllowed` | no | 0 |
//! | `SnapshotRegenerated` | yes | 1 |
//!
//! A fresh or regenerated snapshot fails the run on purpose: automated
//! pipelines stop until someone commits the new baseline.
//!
//! ## Architecture
//!
//! ```text
//!                ┌─────────────────┐
//!                │  SnapshotGuard  │
//!                │   (run loop)    │
//!                └────────┬────────┘
//!                         │
//!        ┌────────────────┼────────────────┐
//!        ▼                ▼                ▼
//!  ┌──────────┐   ┌──────────────┐   ┌──────────┐
//!  │  store   │   │ SchemaEngine │   │ snapshot │
//!  │ (files)  │   │  (catalog)   │   │ (signer, │
//!  │          │   │              │   │changelog)│
//!  └──────────┘   └──────────────┘   └──────────┘
//! ```
//!
//! ## Known Limitations
//!
//! One writer per snapshot file. Two concurrent runs against the same path
//! race, and whichever rename lands last wins.

mod config;
mod error;
mod guard;
mod outcome;
pub mod report;
pub mod store;

pub use config::GuardConfig;
pub use error::GuardError;
pub use guard::{verify_snapshot_file, CheckReport, SnapshotGuard};
pub use outcome::Outcome;

// Re-export component types for convenience
pub use schemaguard_catalog::{CatalogEngine, ToolCatalog, ToolSchema};
pub use schemaguard_snapshot::{ChangeEntry, SchemaEngine, SchemaError, SnapshotError};

/// Core result type for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
