//! Structural validation against the bundled OpenAPI meta-schemas.
//!
//! Each supported version ships its meta-schema as a JSON Schema document
//! (`schemas/*.json`). Documents are evaluated with the `jsonschema` crate and
//! every error is turned into a [`Violation`] addressed by JSON pointer.

use serde_json::Value;

use crate::error::CheckError;
use crate::report::Violation;
use crate::version::SpecVersion;

const SWAGGER_20: &str = include_str!("../schemas/swagger-2.0.json");
const OPENAPI_30: &str = include_str!("../schemas/openapi-3.0.json");
const OPENAPI_31: &str = include_str!("../schemas/openapi-3.1.json");

/// Raw text of the bundled meta-schema for a version.
pub fn meta_schema_source(version: SpecVersion) -> &'static str {
    match version {
        SpecVersion::Swagger20 => SWAGGER_20,
        SpecVersion::OpenApi30 => OPENAPI_30,
        SpecVersion::OpenApi31 => OPENAPI_31,
    }
}

/// Parse and compile the meta-schema for a version.
pub fn compile(version: SpecVersion) -> Result<jsonschema::Validator, CheckError> {
    let meta_schema_error = |message: String| CheckError::MetaSchema { version, message };

    let schema: Value = serde_json::from_str(meta_schema_source(version))
        .map_err(|e| meta_schema_error(e.to_string()))?;

    jsonschema::validator_for(&schema).map_err(|e| meta_schema_error(e.to_string()))
}

/// Validate a document root against the meta-schema of `version`,
/// returning at most `max_errors` violations.
pub fn validate_structure(
    root: &Value,
    version: SpecVersion,
    max_errors: usize,
) -> Result<Vec<Violation>, CheckError> {
    let validator = compile(version)?;

    let violations = validator
        .iter_errors(root)
        .take(max_errors)
        .map(|e| Violation::schema(e.instance_path.to_string(), e.to_string()))
        .collect::<Vec<_>>();

    if !violations.is_empty() {
        log::debug!(
            "{} schema violation(s) against the {} meta-schema",
            violations.len(),
            version.label()
        );
    }

    Ok(violations)
}
