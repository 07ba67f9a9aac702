//! Centralized UI formatting and color utilities
//!
//! This module provides the status icons, colors and quiet-mode detection used
//! by the swagcheck CLI.

use colored::{ColoredString, Colorize};

use crate::report::{ValidationReport, Violation, ViolationKind};

/// Check if quiet mode is enabled via environment variable
pub fn is_quiet() -> bool {
    std::env::var("SWAGCHECK_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Disable colors when stdout is not a terminal or `NO_COLOR` is set.
pub fn configure_colors() {
    let is_tty = atty::is(atty::Stream::Stdout);
    if !is_tty || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
}

/// Returns a colored icon for a pass/fail outcome.
pub fn outcome_icon(passed: bool) -> ColoredString {
    if passed {
        "✓".green()
    } else {
        "✗".red()
    }
}

/// Returns a colored tag for a violation kind.
pub fn kind_tag(kind: ViolationKind) -> ColoredString {
    let tag = format!("[{}]", kind);
    match kind {
        ViolationKind::Schema => tag.red(),
        ViolationKind::Reference => tag.magenta(),
        ViolationKind::Rule => tag.yellow(),
    }
}

/// Common text formatting patterns
pub mod format {
    /// Truncate a message to `max_len` characters, appending `...`
    pub fn truncate(text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            text.to_string()
        } else {
            let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }
}

/// Longest violation message shown in text output. Meta-schema errors embed
/// the offending value, which can be an entire `paths` object.
const MAX_MESSAGE_LEN: usize = 240;

/// Render one violation as an indented line.
pub fn format_violation(violation: &Violation) -> String {
    format!(
        "    {} {} {}",
        kind_tag(violation.kind),
        violation.location().cyan(),
        format::truncate(&violation.message, MAX_MESSAGE_LEN)
    )
}

/// Render a report as a header line plus one line per violation.
pub fn format_report(report: &ValidationReport) -> String {
    let name = report
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<document>".to_string());
    let version = report.version.map(|v| v.label()).unwrap_or("unknown version");

    if report.is_valid() {
        return format!("{} {} ({})", outcome_icon(true), name, version.dimmed());
    }

    let mut lines = vec![format!(
        "{} {} ({}): {} {}",
        outcome_icon(false),
        name,
        version.dimmed(),
        report.violations.len(),
        if report.violations.len() == 1 {
            "violation"
        } else {
            "violations"
        }
    )];
    lines.extend(report.violations.iter().map(format_violation));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SpecVersion;
    use std::path::PathBuf;

    #[test]
    fn test_truncate() {
        assert_eq!(format::truncate("short", 10), "short");
        assert_eq!(format::truncate("a long message", 9), "a long...");
    }

    #[test]
    fn test_format_report_lists_violations() {
        colored::control::set_override(false);
        let mut report = ValidationReport::new(Some(PathBuf::from("api.yaml")));
        report.version = Some(SpecVersion::OpenApi30);
        report.push(Violation::schema("", "\"info\" is a required property"));

        let text = format_report(&report);
        assert!(text.starts_with("✗ api.yaml (OpenAPI 3.0): 1 violation"));
        assert!(text.contains("[schema] (root) \"info\" is a required property"));
    }

    #[test]
    fn test_format_valid_report_is_one_line() {
        colored::control::set_override(false);
        let mut report = ValidationReport::new(Some(PathBuf::from("api.yaml")));
        report.version = Some(SpecVersion::Swagger20);
        assert_eq!(format_report(&report), "✓ api.yaml (Swagger 2.0)");
    }
}
