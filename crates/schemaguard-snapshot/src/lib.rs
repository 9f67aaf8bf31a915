//! # Schemaguard Snapshot - Signed Schema Baselines
//!
//! A snapshot is the committed baseline of a service's API schema. It is a
//! single text file that is both tamper-evident and a changelog of every
//! breaking change that was ever approved.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`signer`] | Signature header: `sign`, `verify`, `signing_token` |
//! | [`changelog`] | Append-only, deduplicated breaking-change log |
//! | [`builder`] | Compose and split the three snapshot regions |
//! | [`engine`] | The [`SchemaEngine`] collaborator trait |
//!
//! ## Data Flow
//!
//! ```text
//! previous block ──┐
//!                  ├─► build_block ──┐
//! breaking changes ┘                 ├─► build ──► sign ──► snapshot text
//! canonical schema ──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use schemaguard_snapshot::{build_block, create_snapshot, signer, ChangeEntry, SnapshotParts};
//!
//! let removed = ChangeEntry::new("FieldRemoved", "field X removed from type Y");
//! let block = build_block("", &[removed], "2026-10-19").unwrap();
//! let snapshot = create_snapshot(&block, "type Query { a: String }");
//!
//! assert!(signer::verify(&snapshot));
//! let parts = SnapshotParts::split(&snapshot).unwrap();
//! assert_eq!(parts.change_log, block);
//! ```

pub mod builder;
pub mod changelog;
pub mod engine;
pub mod models;
pub mod signer;

pub use builder::{build, create_snapshot, SnapshotParts};
pub use changelog::{build_block, ChangeLog};
pub use engine::SchemaEngine;
pub use models::{ChangeEntry, Hash, Result, SchemaError, SnapshotError, HASH_SIZE, LINE_ENDING};
pub use signer::{signing_token, SIGNING_TOKEN};
