//! # Breaking-Change Log
//!
//! Every snapshot carries a log of the breaking changes that were approved
//! over its history. The log is append-only: once a change is recorded it
//! stays recorded, even after the schema moves on and the comparator no
//! longer reports it.
//!
//! ## Block Format
//!
//! ```text
//! # Breaking changes (oldest first)
//! #
//! # [2026-10-19]
//! #   FieldRemoved: field X removed from type Y
//! #   ToolRemoved: tool `search` removed
//! #
//! # [2026-11-02]
//! #   RequiredInputAdded: tool `read` requires new input `mode`
//! ```
//!
//! Entries are listed oldest first. Consecutive entries from the same run
//! share one `[run]` group header. An empty log renders as the empty string
//! (no header at all).
//!
//! ## Merge
//!
//! Entries are keyed by `(kind, description)` in an insertion-ordered map, so
//! the union of the previous log and the new changes is deduplicated and keeps
//! every previously recorded entry in front of anything new.

use crate::models::{ChangeEntry, Result, SnapshotError, LINE_ENDING};
use indexmap::IndexMap;

/// First line of every non-empty change-log block.
pub const CHANGELOG_HEADER: &str = "# Breaking changes (oldest first)";

const SEPARATOR: &str = "#";
const ENTRY_PREFIX: &str = "#   ";
const GROUP_PREFIX: &str = "# [";

/// An ordered, deduplicated set of recorded breaking changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: IndexMap<(String, String), ChangeEntry>,
}

impl ChangeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a rendered change-log block.
    ///
    /// The empty string (or whitespace only) is the empty log.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::MalformedChangeLog`] if the block does not
    /// start with [`CHANGELOG_HEADER`], or contains a line that is neither a
    /// separator, a group header, nor an entry.
    pub fn parse(block: &str) -> Result<Self> {
        let mut log = ChangeLog::new();
        if block.trim().is_empty() {
            return Ok(log);
        }

        let mut lines = block.lines().map(str::trim_end).enumerate();
        match lines.next() {
            Some((_, CHANGELOG_HEADER)) => {}
            Some((_, other)) => return Err(malformed(0, other)),
            None => return Ok(log),
        }

        let mut run: Option<String> = None;
        for (index, line) in lines {
            if line == SEPARATOR || line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix(GROUP_PREFIX) {
                let label = rest
                    .strip_suffix(']')
                    .filter(|label| !label.is_empty())
                    .ok_or_else(|| malformed(index, line))?;
                run = Some(label.to_string());
                continue;
            }

            let body = line
                .strip_prefix(ENTRY_PREFIX)
                .ok_or_else(|| malformed(index, line))?;
            // Kinds never contain ':', and an empty description leaves
            // nothing after the colon once trailing space is trimmed.
            let (kind, description) = body
                .split_once(':')
                .filter(|(kind, _)| !kind.contains(char::is_whitespace))
                .ok_or_else(|| malformed(index, line))?;

            let mut entry = ChangeEntry::new(kind, description);
            entry.run = run.clone();
            log.insert(entry);
        }

        Ok(log)
    }

    /// Records `entry` unless an entry with the same identity exists.
    ///
    /// The entry is stored normalized, exactly as it will read back from the
    /// rendered block. Returns `true` if the entry was new. An existing entry
    /// keeps its original run label.
    pub fn insert(&mut self, entry: ChangeEntry) -> bool {
        let entry = entry.normalized();
        let key = entry.identity();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    /// Merges newly detected changes, tagging new ones with `run`.
    ///
    /// Returns the number of entries that were not already recorded.
    pub fn merge<'a, I>(&mut self, changes: I, run: &str) -> usize
    where
        I: IntoIterator<Item = &'a ChangeEntry>,
    {
        changes
            .into_iter()
            .filter(|change| self.insert((*change).clone().recorded_in(run)))
            .count()
    }

    /// Whether a change with this identity is recorded.
    pub fn contains(&self, change: &ChangeEntry) -> bool {
        self.entries.contains_key(&change.identity())
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.values()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the log as a block. The empty log renders as `""`.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut lines = vec![CHANGELOG_HEADER.to_string()];
        let mut current_run: Option<Option<&str>> = None;

        for entry in self.entries.values() {
            let run = entry.run.as_deref();
            if current_run != Some(run) {
                lines.push(SEPARATOR.to_string());
                if let Some(label) = run {
                    lines.push(format!("{}{}]", GROUP_PREFIX, label));
                }
                current_run = Some(run);
            }
            lines.push(format!("{}{}", ENTRY_PREFIX, entry));
        }

        lines.join(LINE_ENDING)
    }
}

/// Builds the change-log block for a new snapshot.
///
/// Parses `previous_block`, appends every change in `new_changes` whose
/// `(kind, description)` is not yet recorded (tagged with `run`), and renders
/// the result.
///
/// # Example
///
/// ```rust
/// use schemaguard_snapshot::{build_block, ChangeEntry};
///
/// assert_eq!(build_block("", &[], "2026-10-19").unwrap(), "");
///
/// let removed = ChangeEntry::new("FieldRemoved", "field X removed from type Y");
/// let block = build_block("", &[removed], "2026-10-19").unwrap();
/// assert!(block.contains("FieldRemoved: field X removed from type Y"));
/// ```
///
/// # Errors
///
/// Returns an error if `previous_block` is not a well-formed block.
pub fn build_block(previous_block: &str, new_changes: &[ChangeEntry], run: &str) -> Result<String> {
    let mut log = ChangeLog::parse(previous_block)?;
    log.merge(new_changes, run);
    Ok(log.render())
}

fn malformed(index: usize, line: &str) -> SnapshotError {
    SnapshotError::MalformedChangeLog {
        line: index + 1,
        content: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: &str, description: &str) -> ChangeEntry {
        ChangeEntry::new(kind, description)
    }

    fn kinds(log: &ChangeLog) -> Vec<String> {
        log.entries().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn test_empty_block_roundtrips_to_empty() {
        let block = build_block("", &[], "r1").unwrap();
        assert_eq!(block, "");
        assert_eq!(build_block(&block, &[], "r2").unwrap(), "");
        assert!(ChangeLog::parse(&block).unwrap().is_empty());
    }

    #[test]
    fn test_union_keeps_old_entries_first() {
        let a = change("A", "first");
        let b = change("B", "second");
        let c = change("C", "third");

        let previous = build_block("", &[a, b.clone()], "r1").unwrap();
        let merged = build_block(&previous, &[b, c], "r2").unwrap();

        let log = ChangeLog::parse(&merged).unwrap();
        assert_eq!(kinds(&log), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rediscovered_entry_keeps_original_run() {
        let a = change("ToolRemoved", "tool `a` removed");
        let previous = build_block("", &[a.clone()], "2026-01-01").unwrap();
        let merged = build_block(&previous, &[a], "2026-02-01").unwrap();

        assert_eq!(merged, previous);
        let log = ChangeLog::parse(&merged).unwrap();
        assert_eq!(
            log.entries().next().unwrap().run.as_deref(),
            Some("2026-01-01")
        );
    }

    #[test]
    fn test_entries_survive_when_no_longer_detected() {
        let previous = build_block("", &[change("A", "gone")], "r1").unwrap();
        let merged = build_block(&previous, &[], "r2").unwrap();
        assert_eq!(merged, previous);
    }

    #[test]
    fn test_render_groups_by_run() {
        let mut log = ChangeLog::new();
        log.merge(&[change("A", "a"), change("B", "b")], "2026-10-19");
        log.merge(&[change("C", "c")], "2026-11-02");

        let expected = [
            CHANGELOG_HEADER,
            "#",
            "# [2026-10-19]",
            "#   A: a",
            "#   B: b",
            "#",
            "# [2026-11-02]",
            "#   C: c",
        ]
        .join(LINE_ENDING);
        assert_eq!(log.render(), expected);
    }

    #[test]
    fn test_same_run_extends_last_group() {
        let previous = build_block("", &[change("A", "a")], "r1").unwrap();
        let merged = build_block(&previous, &[change("B", "b")], "r1").unwrap();
        assert_eq!(merged.matches("# [r1]").count(), 1);
    }

    #[test]
    fn test_duplicates_within_new_changes_collapse() {
        let block = build_block("", &[change("A", "a"), change("A", "a")], "r1").unwrap();
        assert_eq!(ChangeLog::parse(&block).unwrap().len(), 1);
    }

    #[test]
    fn test_same_kind_different_description_kept() {
        let block = build_block("", &[change("A", "one"), change("A", "two")], "r1").unwrap();
        assert_eq!(ChangeLog::parse(&block).unwrap().len(), 2);
    }

    #[test]
    fn test_description_with_colon_roundtrips() {
        let entry = change("InputTypeChanged", "tool `a`: input type 'x' -> 'y'");
        let block = build_block("", &[entry.clone()], "r1").unwrap();
        let log = ChangeLog::parse(&block).unwrap();
        assert!(log.contains(&entry));
    }

    #[test]
    fn test_empty_description_roundtrips() {
        for description in ["", "   ", "\t\n"] {
            let entry = change("FieldRemoved", description);
            let block = build_block("", &[entry.clone()], "r1").unwrap();
            assert!(block.ends_with("#   FieldRemoved: "));

            let log = ChangeLog::parse(&block).unwrap();
            assert!(log.contains(&entry));
            assert_eq!(build_block(&block, &[entry], "r2").unwrap(), block);
        }
    }

    #[test]
    fn test_empty_kind_roundtrips() {
        let entry = change(" : ", "something changed");
        let block = build_block("", &[entry.clone()], "r1").unwrap();
        let log = ChangeLog::parse(&block).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.contains(&entry));
    }

    #[test]
    fn test_hand_built_entry_not_duplicated_on_rerun() {
        let entry = ChangeEntry {
            kind: "FieldRemoved".to_string(),
            description: "field X  removed".to_string(),
            run: None,
        };
        let first = build_block("", &[entry.clone()], "r1").unwrap();
        let second = build_block(&first, &[entry], "r2").unwrap();

        assert_eq!(second, first);
        assert_eq!(ChangeLog::parse(&second).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_accepts_crlf() {
        let block = format!("{}\r\n#\r\n# [r1]\r\n#   A: a", CHANGELOG_HEADER);
        let log = ChangeLog::parse(&block).unwrap();
        assert_eq!(kinds(&log), vec!["A"]);
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        let err = ChangeLog::parse("#   A: a").unwrap_err();
        assert_eq!(
            err,
            SnapshotError::MalformedChangeLog {
                line: 1,
                content: "#   A: a".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_line() {
        let block = format!("{}\n# something else", CHANGELOG_HEADER);
        assert!(matches!(
            ChangeLog::parse(&block),
            Err(SnapshotError::MalformedChangeLog { line: 2, .. })
        ));
    }
}
