//! Tests covering environment variable loading end to end.
//!
//! Every test holds the shared environment lock through an `EnvScope`, so
//! tests that mutate variables serialise against each other. Each test owns
//! a distinct variable prefix to keep fixtures independent.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

mod common;

use common::{DocLoader, dict};
use strata_config::{Config, EnvLoader, Value};
use test_helpers::env as test_env;

#[test]
fn prefixed_loader_reads_only_matching_variables() {
    let _scope = test_env::scope_with(|lock| {
        vec![
            lock.set_var("STRATA_ENV_DB__HOST", "db.internal"),
            lock.set_var("STRATA_ENV_DB__PORT", "6432"),
            lock.set_var("XSTRATA_ENV_DB__HOST", "elsewhere"),
        ]
    });

    let mut config = Config::new();
    config.add(EnvLoader::prefixed("STRATA_ENV_"));
    config.load().expect("load environment");

    assert_eq!(config.len(), 2);
    assert_eq!(config.get_string("db:host").expect("host"), "db.internal");
    assert_eq!(config.get_int("db:port").expect("port"), 6432);
}

#[test]
fn raw_loader_reads_any_variable() {
    let _scope =
        test_env::scope_with(|lock| vec![lock.set_var("STRATA_RAW_SETTING__LEVEL", "verbose")]);

    let mut config = Config::new();
    config.add(EnvLoader::raw());
    config.load().expect("load environment");

    assert_eq!(
        config
            .get_string("strata_raw_setting:level")
            .expect("level"),
        "verbose",
    );
}

#[test]
fn sibling_variables_merge_into_one_document() {
    let _scope = test_env::scope_with(|lock| {
        vec![
            lock.set_var("STRATA_TREE_DB__HOST", "localhost"),
            lock.set_var("STRATA_TREE_DB__PORT", "5432"),
        ]
    });

    let mut config = Config::new();
    config.add(EnvLoader::prefixed("STRATA_TREE_"));
    config.load().expect("load environment");

    assert_eq!(config.len(), 2);
    assert_eq!(config.get_string("db:host").expect("host"), "localhost");
    assert_eq!(config.get_int("db:port").expect("port"), 5432);
}

#[test]
fn custom_split_patterns_change_nesting() {
    let _scope =
        test_env::scope_with(|lock| vec![lock.set_var("STRATA_SPLIT_DB.POOL.SIZE", "8")]);

    let mut config = Config::new();
    config.add(EnvLoader::prefixed("STRATA_SPLIT_").split("."));
    config.load().expect("load environment");

    assert_eq!(config.get_int("db:pool:size").expect("pool size"), 8);
}

#[test]
fn values_may_contain_equals_signs() {
    let _scope = test_env::scope_with(|lock| vec![lock.set_var("STRATA_EQ_TOKEN", "a=b=c")]);

    let mut config = Config::new();
    config.add(EnvLoader::prefixed("STRATA_EQ_"));
    config.load().expect("load environment");

    assert_eq!(config.get_string("token").expect("token"), "a=b=c");
}

#[test]
fn prefix_only_names_are_skipped() {
    let _scope = test_env::scope_with(|lock| vec![lock.set_var("STRATA_BARE_", "ignored")]);

    let mut config = Config::new();
    config.add(EnvLoader::prefixed("STRATA_BARE_"));
    config.load().expect("load environment");

    assert!(config.is_empty());
}

#[test]
fn environment_overrides_earlier_sources() {
    let _scope =
        test_env::scope_with(|lock| vec![lock.set_var("STRATA_OVR_DB__HOST", "from-env")]);

    let mut config = Config::new();
    config.add(DocLoader(dict([(
        "db",
        Value::from(dict([
            ("host", Value::from("localhost")),
            ("port", Value::from(5432_i64)),
        ])),
    )])));
    config.add(EnvLoader::prefixed("STRATA_OVR_"));
    config.load().expect("load configuration");

    assert_eq!(config.get_string("db:host").expect("host"), "from-env");
    assert_eq!(config.get_int("db:port").expect("port"), 5432);
}
