//! Outcome of a guard run.

use serde::{Deserialize, Serialize};

/// The decision reached by one invocation.
///
/// Only [`Outcome::Unchanged`] and [`Outcome::BreakingChangesAllowed`] let
/// automation pass. Every other outcome stops the pipeline so that a human
/// looks at the snapshot, even when nothing is actually wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No snapshot existed; a fresh one was written and must be committed.
    FirstRun,

    /// The snapshot already matches the current schema.
    Unchanged,

    /// The snapshot was edited by hand.
    TamperedDetected,

    /// Breaking changes were found and not allowed. Nothing was written.
    BreakingChangesBlocked,

    /// Breaking changes were found and allowed, and all of them were already
    /// recorded, so the snapshot did not change.
    BreakingChangesAllowed,

    /// The snapshot was rewritten and must be committed.
    SnapshotRegenerated,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Returns true if automation may continue.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Unchanged | Self::BreakingChangesAllowed)
    }

    /// Human-readable summary.
    pub fn message(&self) -> &'static str {
        match self {
            Self::FirstRun => "New schema snapshot created. Commit it to start tracking breaking changes.",
            Self::Unchanged => "No breaking changes and the schema snapshot is up to date.",
            Self::TamperedDetected => {
                "Manual changes of the schema snapshot detected. The snapshot is generated; do not edit it by hand."
            }
            Self::BreakingChangesBlocked => {
                "Breaking changes detected. Revert them or explicitly allow breaking changes."
            }
            Self::BreakingChangesAllowed => {
                "Allowed breaking changes are already recorded and the schema snapshot is up to date."
            }
            Self::SnapshotRegenerated => {
                "Schema snapshot was outdated and has been regenerated. Run the check locally and commit the updated snapshot."
            }
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Unchanged.exit_code(), 0);
        assert_eq!(Outcome::BreakingChangesAllowed.exit_code(), 0);
        assert_eq!(Outcome::FirstRun.exit_code(), 1);
        assert_eq!(Outcome::TamperedDetected.exit_code(), 1);
        assert_eq!(Outcome::BreakingChangesBlocked.exit_code(), 1);
        assert_eq!(Outcome::SnapshotRegenerated.exit_code(), 1);
    }

    #[test]
    fn test_messages_are_distinct() {
        let all = [
            Outcome::FirstRun,
            Outcome::Unchanged,
            Outcome::TamperedDetected,
            Outcome::BreakingChangesBlocked,
            Outcome::BreakingChangesAllowed,
            Outcome::SnapshotRegenerated,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
