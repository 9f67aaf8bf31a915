//! # Canonical Catalog Rendering
//!
//! The snapshot stores the schema as text and treats *any* byte difference
//! as a change, so the rendering must not depend on the order in which tools,
//! properties or keys happened to be declared.
//!
//! ## Rules
//!
//! Based on the RFC 8785 JSON Canonicalization Scheme, with whitespace added
//! back so the result diffs well in code review:
//!
//! 1. **Object keys** sorted by UTF-16 code units (RFC 8785 §3.2.3)
//! 2. **Numbers** in minimal form (`1.0` renders as `1`)
//! 3. **Strings** with minimal escaping
//! 4. **Set-like arrays** (`required`, `enum`) sorted by their canonical form;
//!    all other arrays keep their order
//! 5. **Layout** two-space indentation, one member per line, lines joined
//!    with the platform [`LINE_ENDING`], no trailing line break
//!
//! ## Example
//!
//! ```rust
//! use schemaguard_catalog::canonicalize::{canonicalize, render_pretty};
//! use serde_json::json;
//!
//! let a = json!({"b": 1, "a": {"required": ["y", "x"]}});
//! let b = json!({"a": {"required": ["x", "y"]}, "b": 1.0});
//!
//! assert_eq!(render_pretty(&a), render_pretty(&b));
//! assert_eq!(canonicalize(&a), r#"{"a":{"required":["x","y"]},"b":1}"#);
//! ```
//!
//! ## References
//!
//! - RFC 8785 - "JSON Canonicalization Scheme (JCS)"
//!   <https://www.rfc-editor.org/rfc/rfc8785>

use crate::models::ToolCatalog;
use schemaguard_snapshot::LINE_ENDING;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

const INDENT: &str = "  ";

/// Keys whose array values are sets rather than sequences.
const SET_KEYS: &[&str] = &["required", "enum"];

/// Renders a catalog in canonical pretty form.
pub fn render_catalog(catalog: &ToolCatalog) -> String {
    render_pretty(&catalog.to_json_value())
}

/// Renders any JSON value in canonical pretty form.
pub fn render_pretty(value: &Value) -> String {
    let mut out = String::new();
    write_pretty(&mut out, value, 0, false);
    out
}

/// Renders any JSON value in canonical compact form (RFC 8785 plus set
/// sorting).
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_compact(&mut out, value, false);
    out
}

fn write_pretty(out: &mut String, value: &Value, depth: usize, is_set: bool) {
    match value {
        Value::Array(items) if !items.is_empty() => {
            out.push('[');
            for (i, item) in ordered_items(items, is_set).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_pretty(out, item, depth + 1, false);
            }
            newline(out, depth);
            out.push(']');
        }
        Value::Object(map) if !map.is_empty() => {
            out.push('{');
            for (i, (key, item)) in sorted_entries(map).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                out.push_str(&canonicalize_string(key));
                out.push_str(": ");
                write_pretty(out, item, depth + 1, SET_KEYS.contains(&key.as_str()));
            }
            newline(out, depth);
            out.push('}');
        }
        other => write_compact(out, other, false),
    }
}

fn write_compact(out: &mut String, value: &Value, is_set: bool) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonicalize_number(n)),
        Value::String(s) => out.push_str(&canonicalize_string(s)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in ordered_items(items, is_set).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(out, item, false);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in sorted_entries(map).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&canonicalize_string(key));
                out.push(':');
                write_compact(out, item, SET_KEYS.contains(&key.as_str()));
            }
            out.push('}');
        }
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push_str(LINE_ENDING);
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn ordered_items(items: &[Value], is_set: bool) -> Vec<&Value> {
    let mut ordered: Vec<&Value> = items.iter().collect();
    if is_set {
        ordered.sort_by_cached_key(|v| canonicalize(v));
        ordered.dedup_by(|a, b| canonicalize(*a) == canonicalize(*b));
    }
    ordered
}

fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_utf16(a, b));
    entries
}

/// Serializes a number in minimal form.
fn canonicalize_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_nan() || f.is_infinite() => "null".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) => (f as i64).to_string(),
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}

/// Escapes a string with the minimal RFC 8785 escape set.
fn canonicalize_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');

    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\x08' => result.push_str("\\b"),
            '\x0C' => result.push_str("\\f"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }

    result.push('"');
    result
}

/// Compares two strings by their UTF-16 code unit sequences.
fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToolSchema;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(canonicalize(&json!(null)), "null");
        assert_eq!(canonicalize(&json!(true)), "true");
        assert_eq!(canonicalize(&json!(-1)), "-1");
        assert_eq!(canonicalize(&json!(2.0)), "2");
        assert_eq!(canonicalize(&json!(2.5)), "2.5");
        assert_eq!(canonicalize(&json!("he\"llo\n")), r#""he\"llo\n""#);
    }

    #[test]
    fn test_key_sorting() {
        assert_eq!(
            canonicalize(&json!({"z": 1, "a": 2, "m": 3})),
            r#"{"a":2,"m":3,"z":1}"#
        );
    }

    #[test]
    fn test_plain_arrays_keep_order() {
        assert_eq!(canonicalize(&json!({"items": [3, 1, 2]})), r#"{"items":[3,1,2]}"#);
    }

    #[test]
    fn test_set_arrays_sorted_and_deduplicated() {
        assert_eq!(
            canonicalize(&json!({"enum": ["b", "a", "b"], "required": ["z", "y"]})),
            r#"{"enum":["a","b"],"required":["y","z"]}"#
        );
    }

    #[test]
    fn test_pretty_layout() {
        let rendered = render_pretty(&json!({"b": [1, 2], "a": {}, "c": []}));
        let expected = "{\n  \"a\": {},\n  \"b\": [\n    1,\n    2\n  ],\n  \"c\": []\n}";
        assert_eq!(rendered, expected.replace('\n', LINE_ENDING));
    }

    #[test]
    fn test_pretty_uses_platform_line_ending() {
        let rendered = render_pretty(&json!({"a": {"b": ["x\ny"]}}));
        let lines: Vec<&str> = rendered.split(LINE_ENDING).collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|line| !line.contains('\n') && !line.contains('\r')));
        assert!(rendered.contains(r#""x\ny""#));
    }

    #[test]
    fn test_pretty_parses_back_to_same_value() {
        let value = json!({"x": {"nested": [1, {"k": "v"}]}, "y": "s"});
        let reparsed: Value = serde_json::from_str(&render_pretty(&value)).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_catalog_order_independent() {
        let read = ToolSchema {
            name: "read".to_string(),
            description: "Read".to_string(),
            input_schema: json!({"type": "object", "required": ["b", "a"]}),
            output_schema: json!({}),
        };
        let write = ToolSchema {
            name: "write".to_string(),
            description: "Write".to_string(),
            input_schema: json!({"required": ["a", "b"], "type": "object"}),
            output_schema: json!({}),
        };
        let mut write_reordered = write.clone();
        write_reordered.input_schema = json!({"type": "object", "required": ["b", "a"]});

        let one = ToolCatalog::from_tools(vec![read.clone(), write]).unwrap();
        let two = ToolCatalog::from_tools(vec![write_reordered, read]).unwrap();
        assert_eq!(render_catalog(&one), render_catalog(&two));
    }

    #[test]
    fn test_utf16_ordering() {
        assert_eq!(compare_utf16("a", "b"), Ordering::Less);
        assert_eq!(compare_utf16("b", "a"), Ordering::Greater);
        assert_eq!(compare_utf16("a", "a"), Ordering::Equal);
    }
}
