//! Error types for the specification check.
//!
//! The check never recovers locally: every failure is surfaced to the caller
//! as one of the [`CheckError`] variants, carrying whatever diagnostic detail
//! the failing step produced.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::report::ValidationReport;
use crate::version::SpecVersion;

/// Line/column position of a syntax error (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug)]
pub enum CheckError {
    /// The specification file is missing or unreadable.
    Io { path: PathBuf, source: io::Error },
    /// The content is not well-formed YAML or JSON.
    Parse {
        path: Option<PathBuf>,
        message: String,
        location: Option<SourceLocation>,
    },
    /// The document does not conform to the OpenAPI schema.
    Invalid(ValidationReport),
    /// A bundled meta-schema failed to load or compile.
    MetaSchema {
        version: SpecVersion,
        message: String,
    },
}

impl CheckError {
    pub fn is_io(&self) -> bool {
        matches!(self, CheckError::Io { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, CheckError::Parse { .. })
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, CheckError::Invalid(_))
    }

    /// The validation report, when the document was parsed but found invalid.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CheckError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            CheckError::Parse {
                path,
                message,
                location,
            } => {
                let name = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<input>".to_string());
                match location {
                    Some(location) => {
                        write!(f, "Failed to parse {} at {}: {}", name, location, message)
                    }
                    None => write!(f, "Failed to parse {}: {}", name, message),
                }
            }
            CheckError::Invalid(report) => write!(f, "{}", report),
            CheckError::MetaSchema { version, message } => write!(
                f,
                "Bundled {} meta-schema could not be compiled: {}",
                version.label(),
                message
            ),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
