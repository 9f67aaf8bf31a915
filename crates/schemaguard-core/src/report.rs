//! Human-readable reporting of detected changes.

use schemaguard_snapshot::ChangeEntry;
use tracing::{error, warn};

/// Formats a titled list of changes, one per line.
///
/// ```rust
/// use schemaguard_core::report::format_changes;
/// use schemaguard_snapshot::ChangeEntry;
///
/// let text = format_changes("BREAKING CHANGES", &[ChangeEntry::new("ToolRemoved", "tool `a` was removed")]);
/// assert_eq!(text, "BREAKING CHANGES (1):\n  - ToolRemoved: tool `a` was removed");
/// ```
pub fn format_changes(title: &str, changes: &[ChangeEntry]) -> String {
    let mut out = format!("{} ({}):", title, changes.len());
    for change in changes {
        out.push_str("\n  - ");
        out.push_str(&change.to_string());
    }
    out
}

/// Reports breaking changes.
pub fn report_breaking(changes: &[ChangeEntry], allowed: bool) {
    let text = format_changes("BREAKING CHANGES", changes);
    if allowed {
        warn!(count = changes.len(), "{}", text);
    } else {
        error!(count = changes.len(), "{}", text);
    }
}

/// Reports dangerous changes. Informational only.
pub fn report_dangerous(changes: &[ChangeEntry]) {
    warn!(count = changes.len(), "{}", format_changes("DANGEROUS CHANGES", changes));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_changes("DANGEROUS CHANGES", &[]), "DANGEROUS CHANGES (0):");
    }

    #[test]
    fn test_format_multiple() {
        let changes = vec![
            ChangeEntry::new("A", "first"),
            ChangeEntry::new("B", "second"),
        ];
        assert_eq!(
            format_changes("T", &changes),
            "T (2):\n  - A: first\n  - B: second"
        );
    }
}
