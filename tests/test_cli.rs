//! Tests for the swagcheck binary: check, schema, completion, man

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

mod support;
use support::{fixture_path, SpecDir, MINIMAL_OPENAPI};

/// Build a swagcheck command isolated from the user's environment: the
/// global config directory points into `home` and colors are off.
fn swagcheck(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_swagcheck"));
    cmd.env("XDG_CONFIG_HOME", home.join("xdg"))
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("SWAGCHECK_QUIET")
        .env_remove("SWAGCHECK_LOG")
        .current_dir(home);
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to run swagcheck binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// CHECK COMMAND
// ============================================================================

#[test]
fn test_check_valid_file_exits_zero() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg(fixture_path("firecracker.yaml")));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("firecracker.yaml (Swagger 2.0)"), "stdout: {}", out);
    assert!(out.contains("1 file valid"));
}

#[test]
fn test_check_invalid_file_exits_one() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg(fixture_path("missing_info.yaml")));

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("[schema] (root)"), "stdout: {}", out);
    assert!(out.contains("info"));
    assert!(out.contains("1 of 1 file failed"));
}

#[test]
fn test_check_reports_every_file() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg(fixture_path("petstore.json"))
        .arg(fixture_path("undefined_ref.yaml"))
        .arg(specs.path().join("absent.yaml")));

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("petstore.json (OpenAPI 3.0)"));
    assert!(out.contains("[reference]"));
    assert!(out.contains("Failed to read"));
    assert!(out.contains("2 of 3 files failed"));
}

#[test]
fn test_check_parse_error_is_reported() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg(fixture_path("invalid_syntax.yaml")));

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Failed to parse"));
}

#[test]
fn test_check_json_output() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--format", "json"])
        .arg(fixture_path("firecracker.yaml"))
        .arg(fixture_path("duplicate_operation_id.yaml")));

    assert_eq!(output.status.code(), Some(1));
    let outcomes: Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = outcomes.as_array().unwrap();
    assert_eq!(outcomes.len(), 2);

    assert_eq!(outcomes[0]["valid"], true);
    assert_eq!(outcomes[0]["version"], "2.0");

    assert_eq!(outcomes[1]["valid"], false);
    let violations = outcomes[1]["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["kind"], "rule");
    assert_eq!(violations[0]["pointer"], "/paths/~1b/get/operationId");
}

#[test]
fn test_check_json_output_for_unreadable_file() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--format", "json", "absent.yaml"]));

    assert_eq!(output.status.code(), Some(1));
    let outcomes: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcomes[0]["valid"], false);
    assert!(outcomes[0]["error"]
        .as_str()
        .unwrap()
        .contains("Failed to read"));
    assert!(outcomes[0].get("version").is_none());
}

#[test]
fn test_check_quiet_prints_nothing_on_success() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--quiet"])
        .arg(fixture_path("firecracker.yaml")));

    assert!(output.status.success());
    assert!(stdout(&output).is_empty(), "stdout: {}", stdout(&output));
}

#[test]
fn test_check_quiet_env_still_reports_failures() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .env("SWAGCHECK_QUIET", "1")
        .arg("check")
        .arg(fixture_path("firecracker.yaml"))
        .arg(fixture_path("missing_info.yaml")));

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(!out.contains("firecracker.yaml"));
    assert!(out.contains("missing_info.yaml"));
}

#[test]
fn test_check_flags_disable_checks() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--no-references", "--no-rules"])
        .arg(fixture_path("undefined_ref.yaml"))
        .arg(fixture_path("duplicate_operation_id.yaml")));

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

#[test]
fn test_check_reject_remote_refs_flag() {
    let specs = SpecDir::new();
    let path = specs.write(
        "remote.yaml",
        r#"openapi: 3.0.0
info:
  title: t
  version: "1"
paths:
  /things:
    get:
      responses:
        "200":
          $ref: "https://example.com/responses.yaml#/Ok"
"#,
    );

    let lenient = run(swagcheck(specs.path()).arg("check").arg(&path));
    assert!(lenient.status.success());

    let strict = run(swagcheck(specs.path())
        .args(["check", "--reject-remote-refs"])
        .arg(&path));
    assert_eq!(strict.status.code(), Some(1));
    assert!(stdout(&strict).contains("remote references are not allowed"));
}

#[test]
fn test_check_rejects_zero_max_errors() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--max-errors", "0"])
        .arg(fixture_path("firecracker.yaml")));

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--max-errors"));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_check_uses_project_config_specs() {
    let specs = SpecDir::new();
    specs.write("api/one.yaml", MINIMAL_OPENAPI);
    specs.copy_fixture("missing_info.yaml");
    specs.write(".swagcheck.yaml", "specs:\n  - api/*.yaml\nformat: json\n");

    let output = run(swagcheck(specs.path()).arg("check"));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let outcomes: Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = outcomes.as_array().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["path"], "api/one.yaml");
}

#[test]
fn test_check_explicit_config_file() {
    let specs = SpecDir::new();
    let config = specs.write("ci/swagcheck.yaml", "checks:\n  references: false\n");

    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg("--config")
        .arg(&config)
        .arg(fixture_path("undefined_ref.yaml")));

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

#[test]
fn test_check_missing_explicit_config_fails() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path())
        .args(["check", "--config", "nope.yaml"])
        .arg(fixture_path("firecracker.yaml")));

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Config file not found"));
}

#[test]
fn test_global_config_applies() {
    let specs = SpecDir::new();
    specs.write("xdg/swagcheck/config.yaml", "checks:\n  rules: false\n");

    let output = run(swagcheck(specs.path())
        .arg("check")
        .arg(fixture_path("duplicate_operation_id.yaml")));

    assert!(output.status.success(), "stdout: {}", stdout(&output));
}

#[test]
fn test_check_without_paths_or_config_fails() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path()).arg("check"));

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No specification files to check"));
}

// ============================================================================
// UTILITY COMMANDS
// ============================================================================

#[test]
fn test_schema_prints_bundled_meta_schema() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path()).args(["schema", "2.0"]));

    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["required"]
        .as_array()
        .unwrap()
        .contains(&Value::from("swagger")));
}

#[test]
fn test_schema_rejects_unknown_version() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path()).args(["schema", "4.0"]));

    assert!(!output.status.success());
    assert!(stderr(&output).contains("4.0"));
}

#[test]
fn test_completion_generates_script() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path()).args(["completion", "bash"]));

    assert!(output.status.success());
    assert!(stdout(&output).contains("swagcheck"));
}

#[test]
fn test_man_writes_page() {
    let specs = SpecDir::new();
    let out_dir: PathBuf = specs.path().join("man");
    let output = run(swagcheck(specs.path())
        .arg("man")
        .arg("--out-dir")
        .arg(&out_dir));

    assert!(output.status.success());
    let page = fs::read_to_string(out_dir.join("swagcheck.1")).unwrap();
    assert!(page.contains("swagcheck"));
}

#[test]
fn test_version_flag() {
    let specs = SpecDir::new();
    let output = run(swagcheck(specs.path()).arg("--version"));

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("swagcheck "));
}
