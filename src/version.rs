//! Detection of the OpenAPI/Swagger version a document declares.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::report::Violation;

/// Specification versions with a bundled meta-schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecVersion {
    #[serde(rename = "2.0")]
    Swagger20,
    #[serde(rename = "3.0")]
    OpenApi30,
    #[serde(rename = "3.1")]
    OpenApi31,
}

const SWAGGER_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];
const OPENAPI_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

impl SpecVersion {
    pub const ALL: [SpecVersion; 3] = [
        SpecVersion::Swagger20,
        SpecVersion::OpenApi30,
        SpecVersion::OpenApi31,
    ];

    /// Detect the version from the `swagger` / `openapi` field of a document root.
    ///
    /// Numeric values (`swagger: 2.0` unquoted in YAML) are still recognised so
    /// that the meta-schema can report the wrong type instead of failing detection.
    pub fn detect(root: &Value) -> Result<Self, Violation> {
        let object = root.as_object().ok_or_else(|| {
            Violation::schema(
                "",
                format!("document root must be a mapping, found {}", type_name(root)),
            )
        })?;

        if let Some(declared) = object.get("swagger") {
            let declared = scalar_text(declared);
            return match declared.as_deref() {
                Some(v) if v == "2" || v.starts_with("2.0") => Ok(SpecVersion::Swagger20),
                _ => Err(Violation::schema(
                    "/swagger",
                    format!(
                        "unsupported Swagger version `{}`, expected \"2.0\"",
                        declared.unwrap_or_default()
                    ),
                )),
            };
        }

        if let Some(declared) = object.get("openapi") {
            let declared = scalar_text(declared);
            return match declared.as_deref() {
                Some(v) if v.starts_with("3.0") => Ok(SpecVersion::OpenApi30),
                Some(v) if v.starts_with("3.1") => Ok(SpecVersion::OpenApi31),
                _ => Err(Violation::schema(
                    "/openapi",
                    format!(
                        "unsupported OpenAPI version `{}`, expected 3.0.x or 3.1.x",
                        declared.unwrap_or_default()
                    ),
                )),
            };
        }

        Err(Violation::schema(
            "",
            "document declares neither a `swagger` nor an `openapi` version",
        ))
    }

    /// Human-readable name, e.g. "Swagger 2.0".
    pub fn label(&self) -> &'static str {
        match self {
            SpecVersion::Swagger20 => "Swagger 2.0",
            SpecVersion::OpenApi30 => "OpenAPI 3.0",
            SpecVersion::OpenApi31 => "OpenAPI 3.1",
        }
    }

    /// HTTP methods allowed as operation keys in a path item.
    pub fn path_methods(&self) -> &'static [&'static str] {
        match self {
            SpecVersion::Swagger20 => SWAGGER_METHODS,
            SpecVersion::OpenApi30 | SpecVersion::OpenApi31 => OPENAPI_METHODS,
        }
    }

    /// Whether `type` may be a list and `null` a type name (JSON Schema 2020-12).
    pub fn has_type_arrays(&self) -> bool {
        matches!(self, SpecVersion::OpenApi31)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::Swagger20 => write!(f, "2.0"),
            SpecVersion::OpenApi30 => write!(f, "3.0"),
            SpecVersion::OpenApi31 => write!(f, "3.1"),
        }
    }
}

impl FromStr for SpecVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "2" | "2.0" | "swagger" => Ok(SpecVersion::Swagger20),
            "3.0" | "3.0.x" => Ok(SpecVersion::OpenApi30),
            "3" | "3.1" | "3.1.x" | "openapi" => Ok(SpecVersion::OpenApi31),
            other => Err(format!(
                "unknown specification version '{}' (expected 2.0, 3.0 or 3.1)",
                other
            )),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
