//! # Catalog Compatibility Analysis
//!
//! Compares a baseline catalog with the current one and classifies every
//! difference that matters to existing consumers.
//!
//! ## Change Categories
//!
//! | Category | Kind | Example |
//! |----------|------|---------|
//! | Breaking | `ToolRemoved` | tool disappeared |
//! | Breaking | `InputTypeChanged` / `OutputTypeChanged` | `object` -> `array` |
//! | Breaking | `InputPropertyRemoved` | callers still send it |
//! | Breaking | `OutputPropertyRemoved` | callers still read it |
//! | Breaking | `RequiredInputAdded` | old calls now invalid |
//! | Breaking | `InputBecameRequired` | old calls now invalid |
//! | Breaking | `InputPropertyTypeChanged` / `OutputPropertyTypeChanged` | `string` -> `number` |
//! | Breaking | `EnumValueRemoved` | a value callers use is gone |
//! | Dangerous | `OptionalInputAdded` | default behaviour may shift |
//! | Dangerous | `EnumValueAdded` | exhaustive matches in clients |
//! | Dangerous | `OutputBecameOptional` | clients assume presence |
//!
//! Adding a tool, adding an output property, or editing a description is
//! safe and not reported.
//!
//! ## Determinism
//!
//! Tools are visited in name order and properties in name order, so the
//! same pair of catalogs always yields the same list in the same order.

use crate::models::{ToolCatalog, ToolSchema};
use schemaguard_snapshot::ChangeEntry;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// The category of a detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    ToolRemoved,
    InputTypeChanged,
    OutputTypeChanged,
    InputPropertyRemoved,
    OutputPropertyRemoved,
    RequiredInputAdded,
    InputBecameRequired,
    InputPropertyTypeChanged,
    OutputPropertyTypeChanged,
    EnumValueRemoved,
    OptionalInputAdded,
    EnumValueAdded,
    OutputBecameOptional,
}

impl ChangeKind {
    /// The name written into the change log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToolRemoved => "ToolRemoved",
            Self::InputTypeChanged => "InputTypeChanged",
            Self::OutputTypeChanged => "OutputTypeChanged",
            Self::InputPropertyRemoved => "InputPropertyRemoved",
            Self::OutputPropertyRemoved => "OutputPropertyRemoved",
            Self::RequiredInputAdded => "RequiredInputAdded",
            Self::InputBecameRequired => "InputBecameRequired",
            Self::InputPropertyTypeChanged => "InputPropertyTypeChanged",
            Self::OutputPropertyTypeChanged => "OutputPropertyTypeChanged",
            Self::EnumValueRemoved => "EnumValueRemoved",
            Self::OptionalInputAdded => "OptionalInputAdded",
            Self::EnumValueAdded => "EnumValueAdded",
            Self::OutputBecameOptional => "OutputBecameOptional",
        }
    }

    /// Whether this kind can break existing consumers.
    pub fn is_breaking(&self) -> bool {
        !matches!(
            self,
            Self::OptionalInputAdded | Self::EnumValueAdded | Self::OutputBecameOptional
        )
    }
}

/// Which side of a tool a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Input,
    Output,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Input => "input",
            Side::Output => "output",
        }
    }
}

/// All classified differences between two catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDiff {
    /// Changes that can break existing consumers.
    pub breaking: Vec<ChangeEntry>,

    /// Compatible but risky changes.
    pub dangerous: Vec<ChangeEntry>,
}

impl CatalogDiff {
    fn push(&mut self, kind: ChangeKind, description: String) {
        let entry = ChangeEntry::new(kind.as_str(), description);
        if kind.is_breaking() {
            self.breaking.push(entry);
        } else {
            self.dangerous.push(entry);
        }
    }
}

/// Compares two catalogs.
///
/// # Example
///
/// ```rust
/// use schemaguard_catalog::{compare::compare_catalogs, ToolCatalog};
///
/// let old = ToolCatalog::from_json_str(r#"[{"name": "read"}, {"name": "write"}]"#).unwrap();
/// let new = ToolCatalog::from_json_str(r#"[{"name": "read"}]"#).unwrap();
///
/// let diff = compare_catalogs(&old, &new);
/// assert_eq!(diff.breaking.len(), 1);
/// assert_eq!(diff.breaking[0].kind, "ToolRemoved");
/// assert!(diff.dangerous.is_empty());
/// ```
pub fn compare_catalogs(old: &ToolCatalog, new: &ToolCatalog) -> CatalogDiff {
    let mut diff = CatalogDiff::default();

    for old_tool in old.tools() {
        match new.get(&old_tool.name) {
            Some(new_tool) => compare_tools(old_tool, new_tool, &mut diff),
            None => diff.push(
                ChangeKind::ToolRemoved,
                format!("tool `{}` was removed", old_tool.name),
            ),
        }
    }

    diff
}

fn compare_tools(old: &ToolSchema, new: &ToolSchema, diff: &mut CatalogDiff) {
    compare_schemas(&old.name, Side::Input, &old.input_schema, &new.input_schema, diff);
    compare_schemas(&old.name, Side::Output, &old.output_schema, &new.output_schema, diff);
}

fn compare_schemas(tool: &str, side: Side, old: &Value, new: &Value, diff: &mut CatalogDiff) {
    if old == new {
        return;
    }

    let old_type = schema_type(old);
    let new_type = schema_type(new);
    if old_type != new_type {
        let kind = match side {
            Side::Input => ChangeKind::InputTypeChanged,
            Side::Output => ChangeKind::OutputTypeChanged,
        };
        diff.push(
            kind,
            format!(
                "tool `{}` {} type changed from {} to {}",
                tool,
                side.label(),
                type_label(&old_type),
                type_label(&new_type)
            ),
        );
        // Nothing below is comparable across a type change.
        return;
    }

    compare_enum(&format!("tool `{}` {}", tool, side.label()), old, new, diff);

    let old_props = properties(old);
    let new_props = properties(new);
    let old_required = required(old);
    let new_required = required(new);

    for (name, old_prop) in &old_props {
        let subject = format!("tool `{}` {} property `{}`", tool, side.label(), name);
        let Some(new_prop) = new_props.get(name) else {
            let kind = match side {
                Side::Input => ChangeKind::InputPropertyRemoved,
                Side::Output => ChangeKind::OutputPropertyRemoved,
            };
            diff.push(kind, format!("{} was removed", subject));
            continue;
        };

        let old_prop_type = schema_type(old_prop);
        let new_prop_type = schema_type(new_prop);
        if old_prop_type != new_prop_type {
            let kind = match side {
                Side::Input => ChangeKind::InputPropertyTypeChanged,
                Side::Output => ChangeKind::OutputPropertyTypeChanged,
            };
            diff.push(
                kind,
                format!(
                    "{} type changed from {} to {}",
                    subject,
                    type_label(&old_prop_type),
                    type_label(&new_prop_type)
                ),
            );
        } else {
            compare_enum(&subject, old_prop, new_prop, diff);
        }

        let was_required = old_required.contains(name);
        let is_required = new_required.contains(name);
        match side {
            Side::Input if is_required && !was_required => {
                diff.push(ChangeKind::InputBecameRequired, format!("{} is now required", subject));
            }
            Side::Output if was_required && !is_required => {
                diff.push(
                    ChangeKind::OutputBecameOptional,
                    format!("{} is no longer guaranteed", subject),
                );
            }
            _ => {}
        }
    }

    if side == Side::Input {
        for name in new_props.keys().filter(|name| !old_props.contains_key(*name)) {
            let subject = format!("tool `{}` input property `{}`", tool, name);
            if new_required.contains(name) {
                diff.push(
                    ChangeKind::RequiredInputAdded,
                    format!("{} was added as required", subject),
                );
            } else {
                diff.push(
                    ChangeKind::OptionalInputAdded,
                    format!("{} was added as optional", subject),
                );
            }
        }
    }
}

fn compare_enum(subject: &str, old: &Value, new: &Value, diff: &mut CatalogDiff) {
    let (Some(old_values), Some(new_values)) = (enum_values(old), enum_values(new)) else {
        return;
    };

    for value in old_values.difference(&new_values) {
        diff.push(
            ChangeKind::EnumValueRemoved,
            format!("{} enum value {} was removed", subject, value),
        );
    }
    for value in new_values.difference(&old_values) {
        diff.push(
            ChangeKind::EnumValueAdded,
            format!("{} enum value {} was added", subject, value),
        );
    }
}

/// Extracts the declared type of a JSON Schema.
fn schema_type(schema: &Value) -> Option<String> {
    match schema.get("type")? {
        Value::String(s) => Some(s.clone()),
        other => Some(crate::canonicalize::canonicalize(other)),
    }
}

fn type_label(schema_type: &Option<String>) -> String {
    match schema_type {
        Some(t) => format!("'{}'", t),
        None => "unspecified".to_string(),
    }
}

/// Extracts properties from a JSON Schema object, in name order.
fn properties(schema: &Value) -> BTreeMap<String, Value> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// Extracts the `required` list of a JSON Schema object.
fn required(schema: &Value) -> BTreeSet<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts `enum` values in canonical form.
fn enum_values(schema: &Value) -> Option<BTreeSet<String>> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(crate::canonicalize::canonicalize).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_tool(name: &str, input: Value, output: Value) -> ToolSchema {
        ToolSchema {
            name: name.to_string(),
            description: format!("Tool {}", name),
            input_schema: input,
            output_schema: output,
        }
    }

    fn catalog(tools: Vec<ToolSchema>) -> ToolCatalog {
        ToolCatalog::from_tools(tools).unwrap()
    }

    fn kinds(entries: &[ChangeEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.kind.as_str()).collect()
    }

    fn object(props: Value, required: &[&str]) -> Value {
        json!({"type": "object", "properties": props, "required": required})
    }

    #[test]
    fn test_identical_catalogs() {
        let tool = make_tool("read", object(json!({"path": {"type": "string"}}), &["path"]), json!({}));
        let diff = compare_catalogs(&catalog(vec![tool.clone()]), &catalog(vec![tool]));
        assert_eq!(diff, CatalogDiff::default());
    }

    #[test]
    fn test_tool_added_is_safe() {
        let read = make_tool("read", json!({}), json!({}));
        let write = make_tool("write", json!({}), json!({}));
        let diff = compare_catalogs(&catalog(vec![read.clone()]), &catalog(vec![read, write]));
        assert_eq!(diff, CatalogDiff::default());
    }

    #[test]
    fn test_description_change_is_safe() {
        let old = make_tool("read", json!({}), json!({}));
        let mut new = old.clone();
        new.description = "Something else entirely".to_string();
        let diff = compare_catalogs(&catalog(vec![old]), &catalog(vec![new]));
        assert_eq!(diff, CatalogDiff::default());
    }

    #[test]
    fn test_tool_removed() {
        let read = make_tool("read", json!({}), json!({}));
        let write = make_tool("write", json!({}), json!({}));
        let diff = compare_catalogs(&catalog(vec![read.clone(), write]), &catalog(vec![read]));
        assert_eq!(kinds(&diff.breaking), vec!["ToolRemoved"]);
        assert_eq!(diff.breaking[0].description, "tool `write` was removed");
    }

    #[test]
    fn test_input_type_change_stops_further_comparison() {
        let old = make_tool("t", object(json!({"a": {"type": "string"}}), &[]), json!({}));
        let new = make_tool("t", json!({"type": "array"}), json!({}));
        let diff = compare_catalogs(&catalog(vec![old]), &catalog(vec![new]));
        assert_eq!(kinds(&diff.breaking), vec!["InputTypeChanged"]);
        assert_eq!(
            diff.breaking[0].description,
            "tool `t` input type changed from 'object' to 'array'"
        );
    }

    #[test]
    fn test_input_property_changes() {
        let old = make_tool(
            "t",
            object(
                json!({"path": {"type": "string"}, "gone": {"type": "string"}, "mode": {"type": "string"}}),
                &["path"],
            ),
            json!({}),
        );
        let new = make_tool(
            "t",
            object(
                json!({
                    "path": {"type": "number"},
                    "mode": {"type": "string"},
                    "force": {"type": "boolean"},
                    "verbose": {"type": "boolean"}
                }),
                &["path", "mode", "force"],
            ),
            json!({}),
        );

        let diff = compare_catalogs(&catalog(vec![old]), &catalog(vec![new]));
        assert_eq!(
            kinds(&diff.breaking),
            vec![
                "InputPropertyRemoved",
                "InputBecameRequired",
                "InputPropertyTypeChanged",
                "RequiredInputAdded",
            ]
        );
        assert_eq!(kinds(&diff.dangerous), vec!["OptionalInputAdded"]);
    }

    #[test]
    fn test_output_property_changes() {
        let old = make_tool(
            "t",
            json!({}),
            object(json!({"id": {"type": "string"}, "name": {"type": "string"}, "size": {"type": "integer"}}), &["id", "name"]),
        );
        let new = make_tool(
            "t",
            json!({}),
            object(json!({"id": {"type": "string"}, "size": {"type": "string"}, "extra": {"type": "string"}}), &[]),
        );

        let diff = compare_catalogs(&catalog(vec![old]), &catalog(vec![new]));
        assert_eq!(
            kinds(&diff.breaking),
            vec!["OutputPropertyRemoved", "OutputPropertyTypeChanged"]
        );
        assert_eq!(kinds(&diff.dangerous), vec!["OutputBecameOptional"]);
    }

    #[test]
    fn test_enum_changes() {
        let old = make_tool(
            "t",
            object(json!({"mode": {"type": "string", "enum": ["fast", "safe"]}}), &[]),
            json!({}),
        );
        let new = make_tool(
            "t",
            object(json!({"mode": {"type": "string", "enum": ["safe", "turbo"]}}), &[]),
            json!({}),
        );

        let diff = compare_catalogs(&catalog(vec![old]), &catalog(vec![new]));
        assert_eq!(kinds(&diff.breaking), vec!["EnumValueRemoved"]);
        assert_eq!(kinds(&diff.dangerous), vec!["EnumValueAdded"]);
        assert!(diff.breaking[0].description.contains("\"fast\""));
    }

    #[test]
    fn test_deterministic_order() {
        let old = catalog(vec![
            make_tool("b", json!({}), json!({})),
            make_tool("a", json!({}), json!({})),
        ]);
        let diff = compare_catalogs(&old, &ToolCatalog::new());
        let descriptions: Vec<&str> = diff.breaking.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["tool `a` was removed", "tool `b` was removed"]);
    }

    #[test]
    fn test_kind_classification() {
        assert!(ChangeKind::ToolRemoved.is_breaking());
        assert!(!ChangeKind::EnumValueAdded.is_breaking());
        assert_eq!(ChangeKind::RequiredInputAdded.as_str(), "RequiredInputAdded");
    }
}
