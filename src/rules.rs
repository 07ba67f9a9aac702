//! Semantic rules that the OpenAPI meta-schemas cannot express.
//!
//! - operation IDs are unique across the document
//! - path template parameters and `in: path` parameters agree
//! - a parameter list never declares the same `name` + `in` twice
//! - Swagger 2.0 operations have at most one body parameter and never mix
//!   body with form data
//! - `default` values agree with the `type` and `enum` beside them

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::refs::{LinkedDocument, Resolved};
use crate::report::Violation;
use crate::version::SpecVersion;
use crate::walk;

/// Guard against reference cycles when following `$ref`s.
const MAX_REF_DEPTH: usize = 32;

/// One operation of the document, with the path item that holds it.
struct Operation<'a> {
    path: &'a str,
    method: &'a str,
    pointer: String,
    object: &'a Map<String, Value>,
    path_item: &'a Map<String, Value>,
    path_item_pointer: String,
    /// File the path item was loaded from, `None` for the root document
    origin: Option<&'a Path>,
}

/// A resolved parameter with the pointer of its declaration.
struct Parameter<'a> {
    name: &'a str,
    location: &'a str,
    pointer: String,
}

/// The parameters of one list, and whether any entry could not be followed.
struct ParameterList<'a> {
    params: Vec<Parameter<'a>>,
    unresolved: bool,
}

/// Run every rule against a document and the files it references.
pub fn check_rules(linked: &LinkedDocument<'_>) -> Vec<Violation> {
    let version = linked.version();
    let root = linked.document().root();
    let operations = collect_operations(linked);

    let mut violations = Vec::new();
    violations.extend(unique_operation_ids(&operations));
    violations.extend(duplicate_parameters(linked, &operations));
    violations.extend(path_parameters(linked, &operations));
    if version == SpecVersion::Swagger20 {
        violations.extend(body_parameters(linked, &operations));
    }
    violations.extend(default_values(root, version));
    violations
}

fn collect_operations<'a>(linked: &'a LinkedDocument<'_>) -> Vec<Operation<'a>> {
    let root = linked.document().root();
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        if path.starts_with("x-") {
            continue;
        }
        let path_item_pointer = walk::child_pointer("/paths", path);
        let Some((item, origin)) = resolve(linked, None, item) else {
            continue;
        };
        let Some(path_item) = item.as_object() else {
            continue;
        };

        for &method in linked.version().path_methods() {
            if let Some(object) = path_item.get(method).and_then(Value::as_object) {
                operations.push(Operation {
                    path,
                    method,
                    pointer: walk::child_pointer(&path_item_pointer, method),
                    object,
                    path_item,
                    path_item_pointer: path_item_pointer.clone(),
                    origin,
                });
            }
        }
    }
    operations
}

/// Follow `$ref`s, across files, until a concrete node is reached. Remote
/// and dangling references yield `None`; those are reported elsewhere.
fn resolve<'a>(
    linked: &'a LinkedDocument<'_>,
    mut origin: Option<&'a Path>,
    mut value: &'a Value,
) -> Option<(&'a Value, Option<&'a Path>)> {
    for _ in 0..MAX_REF_DEPTH {
        match value.get("$ref").and_then(Value::as_str) {
            Some(reference) => match linked.lookup(origin, reference).ok()? {
                Resolved::Node {
                    value: target,
                    origin: target_origin,
                } => {
                    value = target;
                    origin = target_origin;
                }
                Resolved::Remote => return None,
            },
            None => return Some((value, origin)),
        }
    }
    None
}

fn parameter_list<'a>(
    linked: &'a LinkedDocument<'_>,
    origin: Option<&'a Path>,
    holder: &'a Map<String, Value>,
    holder_pointer: &str,
) -> ParameterList<'a> {
    let mut list = ParameterList {
        params: Vec::new(),
        unresolved: false,
    };
    let Some(items) = holder.get("parameters").and_then(Value::as_array) else {
        return list;
    };
    let list_pointer = walk::child_pointer(holder_pointer, "parameters");

    for (index, item) in items.iter().enumerate() {
        let Some((param, _)) = resolve(linked, origin, item) else {
            list.unresolved = true;
            continue;
        };
        let name = param.get("name").and_then(Value::as_str);
        let location = param.get("in").and_then(Value::as_str);
        if let (Some(name), Some(location)) = (name, location) {
            list.params.push(Parameter {
                name,
                location,
                pointer: format!("{}/{}", list_pointer, index),
            });
        }
    }
    list
}

/// Path-level parameters overridden by operation-level ones of the same
/// `name` + `in`.
fn effective_parameters<'a>(
    linked: &'a LinkedDocument<'_>,
    operation: &Operation<'a>,
) -> ParameterList<'a> {
    let own = parameter_list(linked, operation.origin, operation.object, &operation.pointer);
    let inherited = parameter_list(
        linked,
        operation.origin,
        operation.path_item,
        &operation.path_item_pointer,
    );

    let mut params: Vec<Parameter<'a>> = inherited
        .params
        .into_iter()
        .filter(|inherited| {
            !own.params
                .iter()
                .any(|p| p.name == inherited.name && p.location == inherited.location)
        })
        .collect();
    params.extend(own.params);
    ParameterList {
        params,
        unresolved: own.unresolved || inherited.unresolved,
    }
}

fn unique_operation_ids(operations: &[Operation<'_>]) -> Vec<Violation> {
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    let mut violations = Vec::new();

    for operation in operations {
        let Some(id) = operation.object.get("operationId").and_then(Value::as_str) else {
            continue;
        };
        match first_seen.get(id) {
            Some(first) => violations.push(Violation::rule(
                walk::child_pointer(&operation.pointer, "operationId"),
                format!("operationId `{}` is not unique (first used at {})", id, first),
            )),
            None => {
                first_seen.insert(id, &operation.pointer);
            }
        }
    }
    violations
}

fn duplicate_parameters(
    linked: &LinkedDocument<'_>,
    operations: &[Operation<'_>],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut checked_path_items = BTreeSet::new();

    let mut check = |list: ParameterList<'_>| {
        let mut seen = BTreeSet::new();
        for param in list.params {
            if !seen.insert((param.name, param.location)) {
                violations.push(Violation::rule(
                    param.pointer,
                    format!("duplicate parameter `{}` in {}", param.name, param.location),
                ));
            }
        }
    };

    for operation in operations {
        if checked_path_items.insert(operation.path_item_pointer.as_str()) {
            check(parameter_list(
                linked,
                operation.origin,
                operation.path_item,
                &operation.path_item_pointer,
            ));
        }
        check(parameter_list(
            linked,
            operation.origin,
            operation.object,
            &operation.pointer,
        ));
    }
    violations
}

/// Names between braces in a path template, e.g. `drive_id` in `/drives/{drive_id}`.
fn template_names(path: &str) -> Vec<&str> {
    path.split('{')
        .skip(1)
        .filter_map(|segment| segment.split_once('}').map(|(name, _)| name))
        .filter(|name| !name.is_empty())
        .collect()
}

fn path_parameters(
    linked: &LinkedDocument<'_>,
    operations: &[Operation<'_>],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for operation in operations {
        let names = template_names(operation.path);
        let ParameterList { params, unresolved } = effective_parameters(linked, operation);
        let method = operation.method.to_uppercase();

        for name in &names {
            // A remote or broken parameter reference may declare any name.
            let declared = unresolved
                || params
                    .iter()
                    .any(|p| p.location == "path" && p.name == *name);
            if !declared {
                violations.push(Violation::rule(
                    operation.pointer.clone(),
                    format!(
                        "path parameter `{}` of `{}` is not defined for {}",
                        name, operation.path, method
                    ),
                ));
            }
        }

        for param in params.iter().filter(|p| p.location == "path") {
            if !names.contains(&param.name) {
                violations.push(Violation::rule(
                    param.pointer.clone(),
                    format!(
                        "path parameter `{}` for {} does not appear in the template `{}`",
                        param.name, method, operation.path
                    ),
                ));
            }
        }
    }
    violations
}

fn body_parameters(
    linked: &LinkedDocument<'_>,
    operations: &[Operation<'_>],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for operation in operations {
        let params = effective_parameters(linked, operation).params;
        let bodies = params.iter().filter(|p| p.location == "body").count();
        let has_form_data = params.iter().any(|p| p.location == "formData");

        if bodies > 1 {
            violations.push(Violation::rule(
                operation.pointer.clone(),
                format!(
                    "{} {} declares {} body parameters, at most one is allowed",
                    operation.method.to_uppercase(),
                    operation.path,
                    bodies
                ),
            ));
        }
        if bodies > 0 && has_form_data {
            violations.push(Violation::rule(
                operation.pointer.clone(),
                format!(
                    "{} {} mixes body and formData parameters",
                    operation.method.to_uppercase(),
                    operation.path
                ),
            ));
        }
    }
    violations
}

fn default_values(root: &Value, version: SpecVersion) -> Vec<Violation> {
    let mut violations = Vec::new();

    walk::visit_objects(root, "", version, &mut |pointer, object| {
        let Some(default) = object.get("default") else {
            return;
        };
        let default_pointer = walk::child_pointer(pointer, "default");

        if let Some(types) = declared_types(object.get("type"), version) {
            let nullable = object.get("nullable").and_then(Value::as_bool) == Some(true);
            let allowed = (default.is_null() && nullable)
                || types.iter().any(|ty| matches_type(default, ty));
            if !allowed {
                violations.push(Violation::rule(
                    default_pointer.clone(),
                    format!(
                        "default value {} does not match type `{}`",
                        default,
                        types.join(" | ")
                    ),
                ));
                return;
            }
        }

        if let Some(values) = object.get("enum").and_then(Value::as_array) {
            if !values.contains(default) {
                violations.push(Violation::rule(
                    default_pointer,
                    format!("default value {} is not one of the enum values", default),
                ));
            }
        }
    });
    violations
}

/// Primitive type names declared by a `type` keyword, or `None` when the
/// keyword is absent or not a type declaration (e.g. a property named `type`).
fn declared_types(value: Option<&Value>, version: SpecVersion) -> Option<Vec<&str>> {
    match value? {
        Value::String(ty) => Some(vec![ty.as_str()]),
        Value::Array(items) if version.has_type_arrays() => {
            items.iter().map(Value::as_str).collect::<Option<Vec<_>>>()
        }
        _ => None,
    }
}

fn matches_type(value: &Value, ty: &str) -> bool {
    match ty {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
        }
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        // `file` and unknown names are left to the meta-schema.
        _ => true,
    }
}
