//! Validation reports and the violations they collect.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::CheckError;
use crate::version::SpecVersion;

/// Which stage of the check produced a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// Structural mismatch against the OpenAPI meta-schema
    Schema,
    /// A `$ref` that does not resolve
    Reference,
    /// A semantic rule the meta-schema cannot express
    Rule,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Reference => write!(f, "reference"),
            Self::Rule => write!(f, "rule"),
        }
    }
}

/// A single problem found in a specification document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// JSON pointer to the offending node (empty for the document root)
    pub pointer: String,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    pub fn schema(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Schema, pointer, message)
    }

    pub fn reference(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Reference, pointer, message)
    }

    pub fn rule(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Rule, pointer, message)
    }

    /// Pointer for display, `(root)` when it addresses the whole document.
    pub fn location(&self) -> &str {
        if self.pointer.is_empty() {
            "(root)"
        } else {
            &self.pointer
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location(), self.message)
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// File the document was read from, if any
    pub source: Option<PathBuf>,
    /// Detected specification version (absent when detection failed)
    pub version: Option<SpecVersion>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            version: None,
            violations: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.version.is_some() && self.violations.is_empty()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Convert into the check result: the detected version, or
    /// [`CheckError::Invalid`] carrying this report.
    pub fn into_result(self) -> Result<SpecVersion, CheckError> {
        match self.version {
            Some(version) if self.violations.is_empty() => Ok(version),
            _ => Err(CheckError::Invalid(self)),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "document".to_string());
        let kind = self
            .version
            .map(|v| v.label())
            .unwrap_or("OpenAPI");

        if self.is_valid() {
            return write!(f, "{} is a valid {} document", name, kind);
        }

        write!(
            f,
            "{} is not a valid {} document ({} {})",
            name,
            kind,
            self.violations.len(),
            if self.violations.len() == 1 {
                "violation"
            } else {
                "violations"
            }
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}
