//! The specification check: version detection, meta-schema validation,
//! reference resolution and semantic rules, in that order.

use std::path::Path;
use std::time::Instant;

use crate::document::SpecDocument;
use crate::error::CheckError;
use crate::refs::{self, LinkedDocument, RemoteRefPolicy};
use crate::report::ValidationReport;
use crate::rules;
use crate::schema;
use crate::version::SpecVersion;

/// Default cap on schema violations reported per document
pub const DEFAULT_MAX_ERRORS: usize = 50;

/// Which stages of the check run, and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Resolve every `$ref`
    pub references: bool,
    /// Apply the semantic rules
    pub rules: bool,
    pub remote_refs: RemoteRefPolicy,
    /// Cap on meta-schema violations per document
    pub max_errors: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            references: true,
            rules: true,
            remote_refs: RemoteRefPolicy::Skip,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

/// Validates specification documents. Holds only its options, so the same
/// validator gives the same answer for the same document every time.
#[derive(Debug, Clone, Default)]
pub struct SpecValidator {
    options: CheckOptions,
}

impl SpecValidator {
    pub fn new(options: CheckOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Produce the full report for a document without turning violations
    /// into an error. Only a broken bundled meta-schema fails here.
    pub fn report(&self, document: &SpecDocument) -> Result<ValidationReport, CheckError> {
        let started = Instant::now();
        let mut report = ValidationReport::new(document.source().map(Path::to_path_buf));
        let root = document.root();

        let version = match SpecVersion::detect(root) {
            Ok(version) => version,
            Err(violation) => {
                report.push(violation);
                return Ok(report);
            }
        };
        report.version = Some(version);
        log::debug!("Detected {} document", version.label());

        report.extend(schema::validate_structure(
            root,
            version,
            self.options.max_errors,
        )?);

        if self.options.references || self.options.rules {
            let linked = LinkedDocument::load(document, version);
            if self.options.references {
                report.extend(refs::check_linked(&linked, self.options.remote_refs));
            }
            if self.options.rules {
                report.extend(rules::check_rules(&linked));
            }
        }

        log::debug!(
            "Checked {} in {:?}: {} violation(s)",
            document
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "document".to_string()),
            started.elapsed(),
            report.violations.len()
        );

        Ok(report)
    }

    /// Validate a document, failing with [`CheckError::Invalid`] when it does
    /// not conform. Returns the detected version on success.
    pub fn validate(&self, document: &SpecDocument) -> Result<SpecVersion, CheckError> {
        self.report(document)?.into_result()
    }

    /// Read, parse and validate a specification file.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<SpecVersion, CheckError> {
        let document = SpecDocument::read_from_filename(path)?;
        self.validate(&document)
    }
}
