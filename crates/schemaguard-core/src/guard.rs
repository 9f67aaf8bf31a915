//! The snapshot guard run.
//!
//! [`SnapshotGuard::check`] is a single pass through a small state machine:
//!
//! ```text
//! Start ──(no file)──────────────────────────────► FirstRun (write, fail)
//!   │
//!   ▼
//! Verify ──(bad signature)───────────────────────► TamperedDetected
//!   │
//!   ▼
//! Compare ──(breaking, not allowed)──────────────► BreakingChangesBlocked
//!   │
//!   ▼
//! Rebuild ──(same bytes)─────────────────────────► Unchanged / BreakingChangesAllowed
//!   │
//!   └──(different bytes, write)──────────────────► SnapshotRegenerated (fail)
//! ```
//!
//! Nothing is written on the tampered or blocked paths.

use crate::{config::GuardConfig, error::GuardError, outcome::Outcome, report, store, Result};

use schemaguard_snapshot::{build_block, create_snapshot, signer, ChangeEntry, SchemaEngine, SnapshotParts};

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What a guard run decided and found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// The decision.
    pub outcome: Outcome,

    /// Breaking changes against the previous snapshot.
    pub breaking_changes: Vec<ChangeEntry>,

    /// Dangerous changes against the previous snapshot.
    pub dangerous_changes: Vec<ChangeEntry>,

    /// The snapshot file the run worked on.
    pub snapshot_path: PathBuf,

    /// Whether the snapshot file was (re)written.
    pub written: bool,
}

/// Checks a schema against its committed snapshot and keeps the snapshot
/// current.
///
/// # Example
///
/// ```rust,no_run
/// use schemaguard_catalog::{CatalogEngine, ToolCatalog};
/// use schemaguard_core::{GuardConfig, SnapshotGuard};
///
/// let guard = SnapshotGuard::new(GuardConfig::new("api/schema.snapshot"), CatalogEngine)?;
/// let schema = ToolCatalog::from_json_str(r#"[{"name": "read"}]"#)?;
///
/// let report = guard.check(&schema)?;
/// std::process::exit(report.outcome.exit_code());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SnapshotGuard<E: SchemaEngine> {
    /// Configuration.
    config: GuardConfig,

    /// Schema parsing, rendering and comparison.
    engine: E,
}

impl<E: SchemaEngine> SnapshotGuard<E> {
    /// Creates a guard.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Config`] if the configuration is invalid.
    pub fn new(config: GuardConfig, engine: E) -> Result<Self> {
        config.validate()?;
        debug!(
            "Snapshot guard for {} (breaking changes allowed: {})",
            config.snapshot_location.display(),
            config.allow_breaking_changes
        );
        Ok(Self { config, engine })
    }

    /// The configuration in use.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// The schema engine in use.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Runs the check for `schema`.
    ///
    /// # Errors
    ///
    /// - [`GuardError::TamperedSnapshot`] if the snapshot was edited by hand
    /// - [`GuardError::BreakingChangesBlocked`] if breaking changes are found
    ///   and not allowed
    /// - [`GuardError::Io`] for read or write failures other than a missing
    ///   snapshot
    /// - [`GuardError::Snapshot`] / [`GuardError::Schema`] if a verified
    ///   snapshot cannot be taken apart or parsed
    pub fn check(&self, schema: &E::Schema) -> Result<CheckReport> {
        let path = self.config.snapshot_location.as_path();

        let old_snapshot = match store::read_snapshot(path) {
            Ok(text) => text,
            Err(GuardError::MissingSnapshot { .. }) => return self.first_run(schema),
            Err(err) => {
                error!("Failed to read schema snapshot: {}", err);
                return Err(err);
            }
        };

        debug!("Verifying snapshot signature: {}", path.display());
        if !signer::verify(&old_snapshot) {
            let err = GuardError::TamperedSnapshot {
                path: path.to_path_buf(),
            };
            error!("{}", err);
            return Err(err);
        }

        let parts = SnapshotParts::split(&old_snapshot)?;
        let old_schema = self.engine.parse_schema_text(&parts.schema)?;

        let breaking_changes = self.engine.find_breaking_changes(&old_schema, schema);
        if !breaking_changes.is_empty() {
            report::report_breaking(&breaking_changes, self.config.allow_breaking_changes);
            if !self.config.allow_breaking_changes {
                return Err(GuardError::BreakingChangesBlocked {
                    changes: breaking_changes,
                });
            }
        }

        let dangerous_changes = self.engine.find_dangerous_changes(&old_schema, schema);
        if !dangerous_changes.is_empty() {
            report::report_dangerous(&dangerous_changes);
        }

        let run_label = self.config.effective_run_label();
        let block = build_block(&parts.change_log, &breaking_changes, &run_label)?;
        let new_snapshot = create_snapshot(&block, &self.engine.render_canonical(schema));

        let mut report = CheckReport {
            outcome: Outcome::Unchanged,
            breaking_changes,
            dangerous_changes,
            snapshot_path: path.to_path_buf(),
            written: false,
        };

        if new_snapshot == old_snapshot {
            if !report.breaking_changes.is_empty() {
                report.outcome = Outcome::BreakingChangesAllowed;
            }
            info!("{}", report.outcome);
            return Ok(report);
        }

        warn!("Schema snapshot is outdated (updating automatically)");
        store::write_snapshot(path, &new_snapshot).inspect_err(|err| {
            error!("Failed to write schema snapshot: {}", err);
        })?;

        report.outcome = Outcome::SnapshotRegenerated;
        report.written = true;
        warn!("{}", report.outcome);
        Ok(report)
    }

    /// No baseline exists: snapshot the schema as it is. There is nothing to
    /// compare against, so no changes are reported.
    fn first_run(&self, schema: &E::Schema) -> Result<CheckReport> {
        let path = self.config.snapshot_location.as_path();
        warn!("No schema snapshot at {}; creating one", path.display());

        let block = build_block("", &[], &self.config.effective_run_label())?;
        let snapshot = create_snapshot(&block, &self.engine.render_canonical(schema));

        store::write_snapshot(path, &snapshot).inspect_err(|err| {
            error!("Failed to write schema snapshot: {}", err);
        })?;
        info!("New schema snapshot saved to: {}", path.display());

        Ok(CheckReport {
            outcome: Outcome::FirstRun,
            breaking_changes: Vec::new(),
            dangerous_changes: Vec::new(),
            snapshot_path: path.to_path_buf(),
            written: true,
        })
    }
}

/// Reads the snapshot at `path` and checks its signature.
///
/// # Errors
///
/// Returns [`GuardError::MissingSnapshot`] or [`GuardError::Io`] if the file
/// cannot be read.
pub fn verify_snapshot_file(path: &Path) -> Result<bool> {
    let text = store::read_snapshot(path)?;
    let valid = signer::verify(&text);
    debug!("Signature of {} valid: {}", path.display(), valid);
    Ok(valid)
}
