//! # Snapshot Assembly
//!
//! A snapshot file has three regions, always in this order:
//!
//! ```text
//! # @generated SignedSnapshot<<...>>      <- signature header
//!
//! # Breaking changes (oldest first)       <- change-log block (may be empty)
//! # ...
//!
//! {                                       <- canonical schema rendering
//!   ...
//! }
//! ```
//!
//! [`build`] produces the unsigned body (with the signing token in place of
//! the signature) and [`create_snapshot`] signs it. [`SnapshotParts::split`]
//! takes a snapshot back apart.

use crate::changelog::CHANGELOG_HEADER;
use crate::models::{Result, SnapshotError, LINE_ENDING};
use crate::signer::{self, SIGNING_TOKEN};

/// Composes the unsigned snapshot body.
///
/// The output is a pure function of the inputs, byte for byte.
pub fn build(change_log_block: &str, canonical_schema: &str) -> String {
    let mut body = String::with_capacity(
        SIGNING_TOKEN.len() + change_log_block.len() + canonical_schema.len() + 16,
    );
    body.push_str("# ");
    body.push_str(SIGNING_TOKEN);
    body.push_str(LINE_ENDING);
    body.push_str(LINE_ENDING);
    body.push_str(change_log_block);
    body.push_str(LINE_ENDING);
    body.push_str(LINE_ENDING);
    body.push_str(canonical_schema);
    body
}

/// Composes and signs a snapshot.
pub fn create_snapshot(change_log_block: &str, canonical_schema: &str) -> String {
    signer::sign(&build(change_log_block, canonical_schema))
}

/// The regions of a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotParts<'a> {
    /// The first line, carrying the signature.
    pub header: &'a str,

    /// The change-log block, without surrounding blank lines. Possibly empty.
    pub change_log: String,

    /// Everything after the change log.
    pub schema: String,
}

impl<'a> SnapshotParts<'a> {
    /// Splits snapshot text into its regions.
    ///
    /// The change-log block is the run of `#` lines after the header; the
    /// schema region is what follows it. A `#` run that does not begin with
    /// the change-log header is left to the schema region.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::MissingSchemaRegion`] if nothing follows the
    /// change log.
    pub fn split(text: &'a str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        let mut index = skip_blank(&rest, 0);
        let mut change_log = Vec::new();
        if rest.get(index).map(|l| l.trim_end()) == Some(CHANGELOG_HEADER) {
            while let Some(line) = rest.get(index).filter(|l| l.starts_with('#')) {
                change_log.push(line.trim_end());
                index += 1;
            }
            index = skip_blank(&rest, index);
        }

        let schema = rest[index..].join(LINE_ENDING);
        if schema.trim().is_empty() {
            return Err(SnapshotError::MissingSchemaRegion);
        }

        Ok(SnapshotParts {
            header,
            change_log: change_log.join(LINE_ENDING),
            schema,
        })
    }
}

fn skip_blank(lines: &[&str], mut index: usize) -> usize {
    while lines.get(index).is_some_and(|l| l.trim().is_empty()) {
        index += 1;
    }
    index
}
