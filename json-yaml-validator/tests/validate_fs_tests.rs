//! Integration tests for `validate_json` and `validate_yaml` on real directories.

use std::fs;
use std::path::Path;

use json_yaml_validator::{
    ConfigError, ExcludeConfig, FsSourceConfig, Mode, PatternMatcher, ValidationConfig,
    ValidationResult, process_results, validate_json, validate_yaml,
};
use tempfile::TempDir;

fn no_exclusion() -> PatternMatcher {
    PatternMatcher::empty()
}

fn crawl(root: &Path) -> FsSourceConfig {
    let mut cfg = FsSourceConfig::default();
    cfg.base_dir = root.to_path_buf();
    cfg
}

fn listed(root: &Path, patterns: &[&str]) -> FsSourceConfig {
    let mut cfg = crawl(root);
    cfg.files = patterns
        .iter()
        .map(|p| format!("{}/{p}", root.display()))
        .collect();
    cfg
}

fn counts(result: &ValidationResult) -> (usize, usize, usize) {
    (result.passed, result.failed, result.skipped)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_single_valid_json_without_schema() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("valid.json"), r#"{"foo": "bar"}"#).unwrap();

    let result = validate_json(&crawl(tmp.path()), &ValidationConfig::default(), &no_exclusion())
        .unwrap();
    assert!(result.success);
    assert_eq!(counts(&result), (1, 0, 0));
    assert!(result.violations.is_empty());
}

#[test]
fn test_schema_failure_reports_instance_path() {
    let tmp = TempDir::new().unwrap();
    let schema = tmp.path().join("schema.json");
    fs::write(
        &schema,
        r#"{"type": "object", "properties": {"foo": {"type": "string"}}, "required": ["foo"]}"#,
    )
    .unwrap();
    fs::create_dir(tmp.path().join("data")).unwrap();
    let invalid = tmp.path().join("data/invalid.json");
    fs::write(&invalid, r#"{"foo": 42}"#).unwrap();

    let mut config = ValidationConfig::default();
    config.json.schema = Some(path_string(&schema));

    let result = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    assert!(!result.success);
    assert_eq!(counts(&result), (0, 1, 0));

    let violation = &result.violations[0];
    assert_eq!(violation.file, path_string(&invalid));
    assert_eq!(violation.errors.len(), 1);
    assert_eq!(violation.errors[0].path.as_deref(), Some("/foo"));
    assert_eq!(violation.errors[0].document, None);

    let serialized = serde_json::to_value(&result).unwrap();
    assert_eq!(serialized["violations"][0]["errors"][0]["path"], "/foo");
    assert!(serialized["violations"][0]["errors"][0].get("document").is_none());
}

#[test]
fn test_unsupported_draft_falls_back_and_still_validates() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.json"), "{}").unwrap();

    let mut config = ValidationConfig::default();
    config.json.schema_version = "evil-draft-999".to_owned();

    let result = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    assert_eq!(counts(&result), (1, 0, 0));
}

#[test]
fn test_overlapping_patterns_pass_a_file_once_but_fail_it_each_time() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.json"), "{}").unwrap();
    fs::write(tmp.path().join("b.json"), "{oops").unwrap();

    let source = listed(tmp.path(), &["*.json", "a.json", "b.json"]);
    let result = validate_json(&source, &ValidationConfig::default(), &no_exclusion()).unwrap();
    assert_eq!(counts(&result), (1, 2, 0));
    assert_eq!(result.violations.len(), 2);
    assert!(result.violations.iter().all(|v| v.file.ends_with("b.json")));
}

#[test]
fn test_overlapping_yaml_patterns_pass_a_file_once_but_fail_it_each_time() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.yaml"), "a: 1\n").unwrap();
    fs::write(tmp.path().join("b.yml"), "b: [oops\n").unwrap();

    let source = listed(tmp.path(), &["*.yaml", "*.yml", "a.yaml", "b.yml"]);
    let result = validate_yaml(&source, &ValidationConfig::default(), &no_exclusion()).unwrap();
    assert_eq!(counts(&result), (1, 2, 0));
    assert_eq!(result.violations.len(), 2);
    assert!(result.violations.iter().all(|v| v.file.ends_with("b.yml")));
}

#[test]
fn test_mixed_file_list_is_split_between_pipelines() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("app.json"), r#"{"a": 1}"#).unwrap();
    fs::write(tmp.path().join("app.yaml"), "a: 1\n").unwrap();
    fs::write(tmp.path().join("notes.md"), "# not validated\n").unwrap();

    let source = listed(tmp.path(), &["app.json", "app.yaml", "notes.md"]);
    let config = ValidationConfig::default();
    let json = validate_json(&source, &config, &no_exclusion()).unwrap();
    let yaml = validate_yaml(&source, &config, &no_exclusion()).unwrap();

    assert_eq!(counts(&json), (1, 0, 0));
    assert_eq!(counts(&yaml), (1, 0, 0));
}

#[test]
fn test_yaml_as_json_moves_ownership() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.json"), "{}").unwrap();
    fs::write(tmp.path().join("b.yaml"), "b: 1\n").unwrap();
    fs::write(tmp.path().join("c.yml"), "c: [broken\n").unwrap();

    let mut config = ValidationConfig::default();
    config.yaml_as_json = true;

    let json = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    let yaml = validate_yaml(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();

    assert_eq!(counts(&json), (2, 1, 0));
    assert_eq!(json.violations[0].errors[0].message, "Invalid JSON");
    assert_eq!(counts(&yaml), (0, 0, 2));
}

#[test]
fn test_multi_document_stream_with_broken_document() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("stream.yaml"),
        "name: first\n---\nname: [second\n",
    )
    .unwrap();

    let mut config = ValidationConfig::default();
    config.allow_multiple_documents = true;

    let result = validate_yaml(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    assert_eq!(counts(&result), (0, 1, 0));
    let errors = &result.violations[0].errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Invalid YAML");
    assert_eq!(errors[0].path, None);
}

#[test]
fn test_single_document_mode_rejects_streams() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("stream.yaml"), "a: 1\n---\nb: 2\n").unwrap();

    let result = validate_yaml(&crawl(tmp.path()), &ValidationConfig::default(), &no_exclusion())
        .unwrap();
    assert_eq!(counts(&result), (0, 1, 0));
}

#[test]
fn test_exclude_file_skips_matching_files() {
    let tmp = TempDir::new().unwrap();
    let exclude = tmp.path().join("exclude.txt");
    fs::write(&exclude, "fixtures/\n*.exclude.json\n").unwrap();
    fs::create_dir(tmp.path().join("fixtures")).unwrap();
    fs::write(tmp.path().join("fixtures/broken.json"), "{").unwrap();
    fs::write(tmp.path().join("broken.exclude.json"), "{").unwrap();
    fs::write(tmp.path().join("good.json"), "{}").unwrap();

    let mut exclude_config = ExcludeConfig::default();
    exclude_config.use_gitignore = false;
    exclude_config.exclude_file = Some(exclude);
    exclude_config.exclude_file_required = true;
    let matcher = PatternMatcher::load(&exclude_config).unwrap();

    let result = validate_json(&crawl(tmp.path()), &ValidationConfig::default(), &matcher).unwrap();
    assert_eq!(counts(&result), (1, 0, 2));
}

#[test]
fn test_hidden_entries_follow_dot_match() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join(".config")).unwrap();
    fs::write(tmp.path().join(".config/settings.json"), "{").unwrap();
    fs::write(tmp.path().join("visible.json"), "{}").unwrap();

    let mut source = crawl(tmp.path());
    let config = ValidationConfig::default();
    let with_dot = validate_json(&source, &config, &no_exclusion()).unwrap();
    assert_eq!(counts(&with_dot), (1, 1, 0));

    source.use_dot_match = false;
    let without_dot = validate_json(&source, &config, &no_exclusion()).unwrap();
    assert_eq!(counts(&without_dot), (1, 0, 0));
}

#[test]
fn test_custom_format_in_schema() {
    let tmp = TempDir::new().unwrap();
    let schema = tmp.path().join("schema.json");
    fs::write(
        &schema,
        r#"{"type": "object", "properties": {"code": {"type": "string", "format": "lowercase_char"}}}"#,
    )
    .unwrap();
    fs::write(tmp.path().join("ok.json"), r#"{"code": "a"}"#).unwrap();
    fs::write(tmp.path().join("bad.json"), r#"{"code": "AB"}"#).unwrap();

    let mut config = ValidationConfig::default();
    config.json.schema = Some(path_string(&schema));
    config.json.custom_formats = vec!["lowercase_char=^[a-z]$".to_owned()];

    let result = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    assert_eq!(counts(&result), (1, 1, 0));
    assert!(result.violations[0].file.ends_with("bad.json"));
}

#[test]
fn test_unknown_format_aborts_before_any_file() {
    let tmp = TempDir::new().unwrap();
    let schema = tmp.path().join("schema.json");
    fs::write(&schema, r#"{"type": "string", "format": "mystery"}"#).unwrap();

    let mut config = ValidationConfig::default();
    config.json.schema = Some(path_string(&schema));

    let err = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap_err();
    assert!(matches!(err, ConfigError::SchemaCompile { .. }));
}

#[test]
fn test_missing_base_dir_is_config_error() {
    let tmp = TempDir::new().unwrap();
    let source = crawl(&tmp.path().join("missing"));
    let err = validate_yaml(&source, &ValidationConfig::default(), &no_exclusion()).unwrap_err();
    assert!(matches!(err, ConfigError::BaseDirNotFound { .. }));
}

#[test]
fn test_end_to_end_verdict() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.json"), "{}").unwrap();
    fs::write(tmp.path().join("b.json"), "[1,").unwrap();
    fs::write(tmp.path().join("c.yaml"), "c: 1\n").unwrap();

    let config = ValidationConfig::default();
    let json = validate_json(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();
    let yaml = validate_yaml(&crawl(tmp.path()), &config, &no_exclusion()).unwrap();

    let warn = process_results(&json, &yaml, &Mode::Warn);
    assert!(!warn.success);
    assert!(!warn.hard_fail);

    let fail = process_results(&json, &yaml, &Mode::Fail);
    assert!(fail.hard_fail);
}
