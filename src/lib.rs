//! # swagcheck - OpenAPI specification checks
//!
//! swagcheck loads an OpenAPI or Swagger specification from disk and
//! validates it against the OpenAPI schema, so a broken API description fails
//! a test run instead of reaching users.
//!
//! ## Overview
//!
//! A check runs in three steps, and any failure is returned unmodified:
//!
//! 1. read the file ([`CheckError::Io`] when it is missing or unreadable)
//! 2. parse it as YAML or JSON ([`CheckError::Parse`] when malformed)
//! 3. validate it ([`CheckError::Invalid`] when it does not conform)
//!
//! Validation covers Swagger 2.0, OpenAPI 3.0 and OpenAPI 3.1 documents:
//! structure against the bundled meta-schemas, `$ref` resolution, and
//! semantic rules such as unique operation IDs and declared path parameters.
//!
//! ## Modules
//!
//! - [`document`] - Reading YAML/JSON into a [`SpecDocument`]
//! - [`version`] - Detecting the declared specification version
//! - [`schema`] - Meta-schema validation with `jsonschema`
//! - [`refs`] - `$ref` resolution
//! - [`rules`] - Semantic rules beyond the meta-schema
//! - [`check`] - The [`SpecValidator`] tying the stages together
//! - [`config`] - Configuration for the command-line tool
//!
//! ## Example
//!
//! ```no_run
//! // Fails the calling test if the specification is not valid.
//! swagcheck::validate_swagger("swagger/firecracker.yaml").unwrap();
//! ```

pub mod check;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod refs;
pub mod report;
pub mod rules;
pub mod schema;
pub mod ui;
pub mod version;
pub mod walk;

pub use check::{CheckOptions, SpecValidator};
pub use document::SpecDocument;
pub use error::CheckError;
pub use report::{ValidationReport, Violation, ViolationKind};
pub use version::SpecVersion;

use std::path::Path;

/// Default path constants.
pub mod paths {
    /// Project configuration file, looked up in the working directory
    pub const PROJECT_CONFIG: &str = ".swagcheck.yaml";
}

/// Read a specification file and validate it with default options.
///
/// Returns normally when the document is a valid OpenAPI description; any
/// I/O, parse or validation error is returned as-is.
pub fn validate_swagger(path: impl AsRef<Path>) -> Result<(), CheckError> {
    let document = SpecDocument::read_from_filename(path)?;
    validate(&document)
}

/// Validate an already-loaded document with default options.
pub fn validate(document: &SpecDocument) -> Result<(), CheckError> {
    SpecValidator::default().validate(document).map(|_| ())
}
