//! # Tool Catalog Data Models
//!
//! An API surface described as a catalog of tools. Each tool has a name, a
//! human-readable description, and JSON Schemas for its input and output.
//!
//! ## Accepted Text Forms
//!
//! | Form | Example |
//! |------|---------|
//! | Wrapped list | `{"tools": [{"name": "read", ...}]}` |
//! | Bare list | `[{"name": "read", ...}]` |
//! | Canonical map | `{"read": {"description": ..., "input_schema": ...}}` |
//!
//! The canonical map is what [`render_catalog`](crate::render_catalog)
//! produces, so snapshot schema regions parse back through the same entry
//! point.

use schemaguard_snapshot::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One tool definition.
///
/// # Example
///
/// ```rust
/// use schemaguard_catalog::ToolSchema;
/// use serde_json::json;
///
/// let schema = ToolSchema {
///     name: "search_files".to_string(),
///     description: "Search for files matching a pattern".to_string(),
///     input_schema: json!({
///         "type": "object",
///         "properties": { "pattern": { "type": "string" } },
///         "required": ["pattern"]
///     }),
///     output_schema: json!({ "type": "array", "items": { "type": "string" } }),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique identifier for the tool.
    pub name: String,

    /// Human-readable description of what the tool does.
    #[serde(default)]
    pub description: String,

    /// JSON Schema defining the tool's input parameters.
    #[serde(default = "empty_object")]
    pub input_schema: Value,

    /// JSON Schema defining the tool's output structure.
    #[serde(default = "empty_object")]
    pub output_schema: Value,
}

/// A tool definition without its name, as stored under the name key of the
/// canonical map form.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolBody {
    #[serde(default)]
    description: String,
    #[serde(default = "empty_object")]
    input_schema: Value,
    #[serde(default = "empty_object")]
    output_schema: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The full set of tools exposed by a service, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolSchema>,
}

impl ToolCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of tools.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateTool`] if two tools share a name.
    pub fn from_tools<I>(tools: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = ToolSchema>,
    {
        let mut catalog = Self::new();
        for tool in tools {
            catalog.insert(tool)?;
        }
        Ok(catalog)
    }

    /// Parses any of the accepted text forms.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Json`] for invalid JSON or tool definitions,
    /// [`SchemaError::Parse`] for JSON of the wrong shape, and
    /// [`SchemaError::DuplicateTool`] for repeated names.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Parses an already-decoded JSON value. See [`ToolCatalog::from_json_str`].
    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Array(items) => Self::from_list(items),
            Value::Object(mut map) => {
                if map.len() == 1 && map.get("tools").is_some_and(Value::is_array) {
                    match map.remove("tools") {
                        Some(Value::Array(items)) => Self::from_list(items),
                        _ => Err(SchemaError::Parse("expected a `tools` array".to_string())),
                    }
                } else {
                    let mut catalog = Self::new();
                    for (name, body) in map {
                        let body: ToolBody = serde_json::from_value(body)?;
                        catalog.insert(ToolSchema {
                            name,
                            description: body.description,
                            input_schema: body.input_schema,
                            output_schema: body.output_schema,
                        })?;
                    }
                    Ok(catalog)
                }
            }
            other => Err(SchemaError::Parse(format!(
                "expected a tool list or map, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_list(items: Vec<Value>) -> Result<Self, SchemaError> {
        let tools = items
            .into_iter()
            .map(serde_json::from_value::<ToolSchema>)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tools(tools)
    }

    /// Adds a tool.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateTool`] if the name is taken, and
    /// [`SchemaError::Parse`] for an empty name.
    pub fn insert(&mut self, tool: ToolSchema) -> Result<(), SchemaError> {
        if tool.name.trim().is_empty() {
            return Err(SchemaError::Parse("tool name must not be empty".to_string()));
        }
        if self.tools.contains_key(&tool.name) {
            return Err(SchemaError::DuplicateTool(tool.name));
        }
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    /// Looks a tool up by name.
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name)
    }

    /// Tools in name order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolSchema> {
        self.tools.values()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if the catalog has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The canonical map form as a JSON value (not yet canonically ordered).
    pub fn to_json_value(&self) -> Value {
        let map = self
            .tools
            .values()
            .map(|tool| {
                let body = ToolBody {
                    description: tool.description.clone(),
                    input_schema: tool.input_schema.clone(),
                    output_schema: tool.output_schema.clone(),
                };
                let body = serde_json::to_value(body).unwrap_or_else(|_| empty_object());
                (tool.name.clone(), body)
            })
            .collect();
        Value::Object(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
