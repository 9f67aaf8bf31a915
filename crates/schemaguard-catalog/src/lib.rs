//! # Schemaguard Catalog - Tool Catalog Schemas
//!
//! A concrete schema layer for services whose API surface is a catalog of
//! tools, each with a JSON Schema input and output. It provides the three
//! things the snapshot guard needs from a schema library:
//!
//! 1. **Parsing** of catalog JSON in several shapes ([`ToolCatalog`])
//! 2. **Canonical rendering** that ignores declaration order
//!    ([`canonicalize`])
//! 3. **Compatibility analysis** splitting differences into breaking and
//!    dangerous changes ([`compare`])
//!
//! [`CatalogEngine`] packages them as a
//! [`SchemaEngine`](schemaguard_snapshot::SchemaEngine).

pub mod canonicalize;
pub mod compare;
pub mod engine;
pub mod models;

pub use canonicalize::render_catalog;
pub use compare::{compare_catalogs, CatalogDiff, ChangeKind};
pub use engine::CatalogEngine;
pub use models::{ToolCatalog, ToolSchema};
