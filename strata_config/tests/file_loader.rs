//! End-to-end tests for the JSON file source.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
#![expect(
    clippy::float_cmp,
    reason = "fixture values are exactly representable; lookups perform no arithmetic"
)]

use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use strata_config::{Config, JsonFile, StrataError};
use tempfile::TempDir;

fn write_settings(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write configuration file");
    path
}

#[test]
fn required_file_loads_a_nested_document() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(
        &dir,
        "settings.json",
        r#"{"name": "api", "db": {"host": "db.internal", "port": 5432, "timeout": 0.25}}"#,
    );

    let mut config = Config::new();
    config.add(JsonFile::required(path));
    config.load().expect("load settings file");

    assert_eq!(config.get_string("name").expect("resolve name"), "api");
    assert_eq!(
        config.get_string("db:host").expect("resolve host"),
        "db.internal"
    );
    assert_eq!(config.get_int("db:port").expect("resolve port"), 5432);
    assert_eq!(
        config.get_float("db:timeout").expect("resolve timeout"),
        0.25
    );
}

#[test]
fn later_files_override_earlier_ones() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let defaults = write_settings(
        &dir,
        "defaults.json",
        r#"{"db": {"host": "localhost", "port": 5432}}"#,
    );
    let overrides = write_settings(&dir, "overrides.json", r#"{"db": {"host": "db.internal"}}"#);

    let mut config = Config::new();
    config.add(JsonFile::required(defaults));
    config.add(JsonFile::required(overrides));
    config.load().expect("load layered files");

    assert_eq!(
        config.get_string("db:host").expect("resolve host"),
        "db.internal"
    );
    assert_eq!(config.get_int("db:port").expect("resolve port"), 5432);
}

#[test]
fn optional_missing_file_contributes_nothing() {
    let dir = tempfile::tempdir().expect("create temp dir");

    let mut config = Config::new();
    config.add(JsonFile::optional(dir.path().join("absent.json")));
    config.load().expect("optional files may be missing");

    assert!(config.is_empty());
}

#[test]
fn required_missing_file_fails_the_load() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("absent.json");

    let mut config = Config::new();
    config.add(JsonFile::required(&missing));
    let error = config.load().expect_err("required files must exist");

    assert!(matches!(
        error,
        StrataError::File { ref path, .. } if path == &missing
    ));
    assert!(config.is_empty());
}

#[rstest]
#[case::truncated_document("{\"db\": {")]
#[case::top_level_array("[1, 2, 3]")]
#[case::top_level_scalar("42")]
#[case::null_value("{\"db\": null}")]
#[case::array_value("{\"ports\": [5432]}")]
fn malformed_documents_fail_with_the_file_path(#[case] contents: &str) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(&dir, "settings.json", contents);

    let mut config = Config::new();
    config.add(JsonFile::required(&path));
    let error = config.load().expect_err("document should be rejected");

    assert!(matches!(
        error,
        StrataError::File { path: ref reported, .. } if reported == &path
    ));
}

#[test]
fn optional_files_still_fail_on_malformed_content() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(&dir, "settings.json", "not json at all");

    let mut config = Config::new();
    config.add(JsonFile::optional(&path));
    let error = config.load().expect_err("present files must parse");

    assert!(matches!(error, StrataError::File { .. }));
}
