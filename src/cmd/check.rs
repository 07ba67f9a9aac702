//! The `check` command: validate specification files and report results.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use swagcheck::config::{Config, OutputFormat};
use swagcheck::refs::RemoteRefPolicy;
use swagcheck::{ui, CheckError, SpecDocument, SpecValidator, SpecVersion, Violation};

/// Arguments of `swagcheck check` after CLI parsing.
pub struct CheckArgs {
    pub paths: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub no_references: bool,
    pub no_rules: bool,
    pub reject_remote_refs: bool,
    pub max_errors: Option<usize>,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

/// Result for one file, as emitted by `--format json`.
#[derive(Debug, Serialize)]
struct FileOutcome {
    path: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<SpecVersion>,
    violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileOutcome {
    fn failed(path: &Path, error: &CheckError) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: false,
            version: None,
            violations: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Check every requested file. Returns `Ok(false)` when any file fails.
pub fn cmd_check(args: &CheckArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => Config::load_with(path)?,
        None => Config::load()?,
    };

    let mut options = config.check_options();
    if args.no_references {
        options.references = false;
    }
    if args.no_rules {
        options.rules = false;
    }
    if args.reject_remote_refs {
        options.remote_refs = RemoteRefPolicy::Reject;
    }
    if let Some(max_errors) = args.max_errors {
        if max_errors == 0 {
            anyhow::bail!("--max-errors must be at least 1");
        }
        options.max_errors = max_errors;
    }

    let files = if args.paths.is_empty() {
        config.resolve_specs()?
    } else {
        args.paths.clone()
    };
    if files.is_empty() {
        anyhow::bail!(
            "No specification files to check. Pass paths or set `specs` in {}",
            swagcheck::paths::PROJECT_CONFIG
        );
    }

    let format = args.format.unwrap_or(config.format);
    let validator = SpecValidator::new(options);
    let outcomes = files
        .iter()
        .map(|path| check_file(&validator, path, format, args.quiet))
        .collect::<Result<Vec<_>>>()?;

    let failed = outcomes.iter().filter(|o| !o.valid).count();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        OutputFormat::Text => {
            if !args.quiet || failed > 0 {
                print_summary(outcomes.len(), failed);
            }
        }
    }

    Ok(failed == 0)
}

fn check_file(
    validator: &SpecValidator,
    path: &Path,
    format: OutputFormat,
    quiet: bool,
) -> Result<FileOutcome> {
    let document = match SpecDocument::read_from_filename(path) {
        Ok(document) => document,
        Err(e) => {
            if format == OutputFormat::Text {
                println!("{} {}", ui::outcome_icon(false), e);
            }
            return Ok(FileOutcome::failed(path, &e));
        }
    };

    let report = match validator.report(&document) {
        Ok(report) => report,
        // A broken bundled meta-schema is a defect in swagcheck itself.
        Err(e @ CheckError::MetaSchema { .. }) => return Err(e.into()),
        Err(e) => {
            if format == OutputFormat::Text {
                println!("{} {}", ui::outcome_icon(false), e);
            }
            return Ok(FileOutcome::failed(path, &e));
        }
    };

    let valid = report.is_valid();
    if format == OutputFormat::Text && (!valid || !quiet) {
        println!("{}", ui::format_report(&report));
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        valid,
        version: report.version,
        violations: report.violations,
        error: None,
    })
}

fn print_summary(total: usize, failed: usize) {
    let noun = if total == 1 { "file" } else { "files" };
    if failed == 0 {
        println!("\n{} {} {} valid", "✓".green(), total, noun);
    } else {
        println!(
            "\n{} {} of {} {} failed",
            "✗".red(),
            failed,
            total,
            noun
        );
    }
}
