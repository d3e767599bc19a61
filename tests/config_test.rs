//! Coverage for config file parsing and resolution.

use std::fs;
use std::path::Path;

use faultline::config::{load_config, resolve_config_with, FaultlineConfig, CONFIG_PATH_ENV};
use faultline::render::Format;
use faultline::{Category, Selection};

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("faultline.toml");
    fs::write(&path, contents).expect("should write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn full_config_parses() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(
        tmp.path(),
        r#"
[grouping]
top = 3
fuzzy = true
threshold = 0.6

[input]
category = "eslint"

[output]
format = "markdown"
max_files = 2
"#,
    );

    let config = load_config(&path).expect("config should load");
    assert_eq!(config.grouping.top, 3);
    assert!(config.grouping.fuzzy);
    assert!((config.grouping.threshold - 0.6).abs() < f64::EPSILON);
    assert_eq!(
        config.selection().expect("valid category"),
        Selection::Forced(Category::Eslint)
    );
    assert_eq!(config.output.format, Format::Markdown);
    assert_eq!(config.output.max_files, 2);
}

#[test]
fn empty_file_uses_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "");

    let config = load_config(&path).expect("empty config should load");
    let defaults = FaultlineConfig::default();
    assert_eq!(config.grouping.top, defaults.grouping.top);
    assert!((config.grouping.threshold - 0.8).abs() < f64::EPSILON);
    assert_eq!(config.output.format, Format::Text);
    assert_eq!(config.output.max_files, 5);
    assert_eq!(config.selection().expect("auto"), Selection::Auto);
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[grouping]\nthreshold = 1.5\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn unknown_category_is_rejected() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[input]\ncategory = \"cobol\"\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn unknown_format_is_a_parse_error() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[output]\nformat = \"yaml\"\n");
    assert!(load_config(&path).is_err());
}

#[test]
fn config_path_from_env_is_used() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[grouping]\ntop = 7\n");
    let path_str = path.to_string_lossy().into_owned();

    let config = resolve_config_with(None, |key| {
        (key == CONFIG_PATH_ENV).then(|| path_str.clone())
    })
    .expect("config should resolve");
    assert_eq!(config.grouping.top, 7);
}

#[test]
fn env_overrides_beat_the_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[output]\nformat = \"markdown\"\n");

    let config = resolve_config_with(Some(&path), |key| {
        (key == "FAULTLINE_FORMAT").then(|| "json".to_owned())
    })
    .expect("config should resolve");
    assert_eq!(config.output.format, Format::Json);
}

#[test]
fn explicit_file_wins_over_env_path() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = write_config(tmp.path(), "[grouping]\ntop = 2\n");

    let config = resolve_config_with(Some(&path), |key| {
        (key == CONFIG_PATH_ENV).then(|| "/nonexistent/faultline.toml".to_owned())
    })
    .expect("explicit path should be used");
    assert_eq!(config.grouping.top, 2);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let missing = tmp.path().join("absent.toml");
    assert!(resolve_config_with(Some(&missing), no_env).is_err());
}
