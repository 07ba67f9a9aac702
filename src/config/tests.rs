use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_config() {
    let content = r#"
specs:
  - api/*.yaml
format: json
checks:
  references: false
  remote_refs: reject
max_errors: 10
"#;
    let config = Config::parse(content).unwrap();
    assert_eq!(config.specs, vec!["api/*.yaml".to_string()]);
    assert_eq!(config.format, OutputFormat::Json);
    assert!(!config.checks.references);
    assert!(config.checks.rules); // default
    assert_eq!(config.checks.remote_refs, RemoteRefPolicy::Reject);
    assert_eq!(config.max_errors, 10);
}

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert!(config.specs.is_empty());
    assert_eq!(config.format, OutputFormat::Text);
    assert_eq!(config.max_errors, 50);
}

#[test]
fn test_parse_rejects_zero_max_errors() {
    let err = Config::parse("max_errors: 0\n").unwrap_err();
    assert!(err.to_string().contains("max_errors"));
}

#[test]
fn test_parse_rejects_invalid_glob() {
    assert!(Config::parse("specs: ['api/[*.yaml']\n").is_err());
}

#[test]
fn test_parse_rejects_unknown_format() {
    assert!(Config::parse("format: xml\n").is_err());
}

#[test]
fn test_load_merged_project_overrides_global() {
    let tmp = TempDir::new().unwrap();
    let global = tmp.path().join("global.yaml");
    let project = tmp.path().join("project.yaml");

    fs::write(
        &global,
        "format: json\nmax_errors: 5\nchecks:\n  rules: false\n  remote_refs: reject\n",
    )
    .unwrap();
    fs::write(&project, "max_errors: 20\nchecks:\n  rules: true\n").unwrap();

    let config = Config::load_merged_from(Some(global.as_path()), Some(project.as_path())).unwrap();
    assert_eq!(config.format, OutputFormat::Json); // from global
    assert_eq!(config.max_errors, 20); // project wins
    assert!(config.checks.rules); // project wins
    assert_eq!(config.checks.remote_refs, RemoteRefPolicy::Reject); // from global
}

#[test]
fn test_load_merged_missing_files_give_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_merged_from(
        Some(tmp.path().join("absent-global.yaml").as_path()),
        Some(tmp.path().join("absent-project.yaml").as_path()),
    )
    .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_with_requires_existing_file() {
    let tmp = TempDir::new().unwrap();
    let err = Config::load_with(&tmp.path().join("nope.yaml")).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_check_options_follow_config() {
    let config = Config::parse("checks:\n  references: false\nmax_errors: 3\n").unwrap();
    let options = config.check_options();
    assert!(!options.references);
    assert!(options.rules);
    assert_eq!(options.max_errors, 3);
}

#[test]
fn test_resolve_specs_expands_globs() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("api")).unwrap();
    fs::write(tmp.path().join("api/b.yaml"), "").unwrap();
    fs::write(tmp.path().join("api/a.yaml"), "").unwrap();
    fs::write(tmp.path().join("api/notes.txt"), "").unwrap();

    let pattern = format!("{}/api/*.yaml", tmp.path().display());
    let config = Config {
        specs: vec![pattern.clone(), pattern],
        ..Config::default()
    };

    let files = config.resolve_specs().unwrap();
    assert_eq!(
        files,
        vec![tmp.path().join("api/a.yaml"), tmp.path().join("api/b.yaml")]
    );
}

#[cfg(unix)]
#[test]
fn test_resolve_specs_skips_unreadable_directories() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("api/v1")).unwrap();
    fs::create_dir_all(tmp.path().join("api/locked")).unwrap();
    fs::write(tmp.path().join("api/v1/spec.yaml"), "").unwrap();
    fs::set_permissions(
        tmp.path().join("api/locked"),
        fs::Permissions::from_mode(0o000),
    )
    .unwrap();

    let config = Config {
        specs: vec![format!("{}/api/*/*.yaml", tmp.path().display())],
        ..Config::default()
    };
    let files = config.resolve_specs();

    fs::set_permissions(
        tmp.path().join("api/locked"),
        fs::Permissions::from_mode(0o755),
    )
    .unwrap();
    assert_eq!(files.unwrap(), vec![tmp.path().join("api/v1/spec.yaml")]);
}

#[test]
fn test_global_config_path_ends_with_swagcheck() {
    if let Some(path) = global_config_path() {
        assert!(path.ends_with("swagcheck/config.yaml"));
    }
}
