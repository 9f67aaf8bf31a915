//! [`SchemaEngine`] implementation for tool catalogs.

use crate::canonicalize::render_catalog;
use crate::compare::compare_catalogs;
use crate::models::ToolCatalog;
use schemaguard_snapshot::{ChangeEntry, SchemaEngine, SchemaError};

/// Schema engine for [`ToolCatalog`] surfaces.
///
/// # Example
///
/// ```rust
/// use schemaguard_catalog::CatalogEngine;
/// use schemaguard_snapshot::SchemaEngine;
///
/// let engine = CatalogEngine;
/// let schema = engine.parse_schema_text(r#"{"tools": [{"name": "read"}]}"#).unwrap();
/// let text = engine.render_canonical(&schema);
///
/// // The canonical rendering parses back to the same catalog.
/// assert_eq!(engine.parse_schema_text(&text).unwrap(), schema);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogEngine;

impl SchemaEngine for CatalogEngine {
    type Schema = ToolCatalog;

    fn parse_schema_text(&self, text: &str) -> Result<ToolCatalog, SchemaError> {
        ToolCatalog::from_json_str(text)
    }

    fn render_canonical(&self, schema: &ToolCatalog) -> String {
        render_catalog(schema)
    }

    fn find_breaking_changes(&self, old: &ToolCatalog, new: &ToolCatalog) -> Vec<ChangeEntry> {
        compare_catalogs(old, new).breaking
    }

    fn find_dangerous_changes(&self, old: &ToolCatalog, new: &ToolCatalog) -> Vec<ChangeEntry> {
        compare_catalogs(old, new).dangerous
    }
}
