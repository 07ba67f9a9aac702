//! Traversal of a document tree with JSON pointer tracking.

use serde_json::{Map, Value};

use crate::version::SpecVersion;

/// Keys whose values are literal payloads, not specification structure.
/// Objects below them are never visited, so an example body containing a
/// `$ref` or `type` field is not mistaken for a reference or schema.
const LITERAL_KEYS: &[&str] = &["example", "default", "enum", "const", "value"];

/// Keys whose values map user-chosen names to nodes. Below them a key such
/// as `default` or `example` is a name, not a literal.
const NAMED_MAPS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "schemas",
    "parameters",
    "responses",
    "requestBodies",
    "headers",
    "securitySchemes",
    "securityDefinitions",
    "links",
    "callbacks",
    "pathItems",
    "webhooks",
    "$defs",
];

/// Escape one reference token for use in a JSON pointer (RFC 6901).
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append a token to a pointer.
pub fn child_pointer(pointer: &str, token: &str) -> String {
    format!("{}/{}", pointer, escape_token(token))
}

/// Call `visit` for every object in the tree, depth first, skipping
/// vendor extensions (`x-*`) and literal payload values.
///
/// `examples` is a literal in Swagger 2.0 and in 3.1 schemas (an array), but
/// a map of Example objects in OpenAPI 3.x components and media types.
pub fn visit_objects<'a, F>(
    value: &'a Value,
    pointer: &str,
    version: SpecVersion,
    visit: &mut F,
) where
    F: FnMut(&str, &'a Map<String, Value>),
{
    visit_inner(value, pointer, None, version, visit);
}

fn visit_inner<'a, F>(
    value: &'a Value,
    pointer: &str,
    named_map: Option<&str>,
    version: SpecVersion,
    visit: &mut F,
) where
    F: FnMut(&str, &'a Map<String, Value>),
{
    match value {
        Value::Object(object) => {
            visit(pointer, object);
            for (key, child) in object {
                let skip = match named_map {
                    None => is_extension_or_literal(key, child, version),
                    // Status codes share the map with `x-*` extensions.
                    Some("responses") => key.starts_with("x-"),
                    Some(_) => false,
                };
                if skip {
                    continue;
                }
                // `parameters` is a list in operations, a name map in components.
                let child_map = match named_map {
                    None if child.is_object() && is_name_map(key, version) => Some(key.as_str()),
                    _ => None,
                };
                visit_inner(child, &child_pointer(pointer, key), child_map, version, visit);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                visit_inner(item, &format!("{}/{}", pointer, index), None, version, visit);
            }
        }
        _ => {}
    }
}

fn is_extension_or_literal(key: &str, child: &Value, version: SpecVersion) -> bool {
    key.starts_with("x-")
        || LITERAL_KEYS.contains(&key)
        || (key == "examples" && !(child.is_object() && version != SpecVersion::Swagger20))
}

fn is_name_map(key: &str, version: SpecVersion) -> bool {
    NAMED_MAPS.contains(&key) || (key == "examples" && version != SpecVersion::Swagger20)
}
