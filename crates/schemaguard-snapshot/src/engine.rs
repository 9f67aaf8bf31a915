//! The schema collaborator interface.
//!
//! The snapshot subsystem never looks inside a schema. Parsing, canonical
//! rendering and compatibility analysis are delegated to a [`SchemaEngine`].

use crate::models::{ChangeEntry, SchemaError};

/// Parses, renders and compares schemas of one kind.
///
/// Implementations must render canonically: two schemas that differ only in
/// the order of their definitions render to identical text.
pub trait SchemaEngine {
    /// The structural schema representation.
    type Schema;

    /// Parses schema text (as found in a snapshot's schema region).
    fn parse_schema_text(&self, text: &str) -> Result<Self::Schema, SchemaError>;

    /// Renders a schema in canonical, sorted form.
    fn render_canonical(&self, schema: &Self::Schema) -> String;

    /// Changes from `old` to `new` that can break existing consumers.
    fn find_breaking_changes(&self, old: &Self::Schema, new: &Self::Schema) -> Vec<ChangeEntry>;

    /// Changes from `old` to `new` that are compatible but risky.
    fn find_dangerous_changes(&self, old: &Self::Schema, new: &Self::Schema) -> Vec<ChangeEntry>;
}
