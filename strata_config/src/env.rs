//! Environment variable source.
//!
//! Variable names encode paths: the split pattern (`__` by default) marks
//! nesting, so `DB__POOL__SIZE=8` contributes the document
//! `{"DB": {"POOL": {"SIZE": "8"}}}`. Values stay strings; the typed
//! accessors parse them on lookup. An optional prefix restricts the loader
//! to variables it owns and is stripped before splitting.

use std::env;

use crate::Loader;
use crate::error::StrataResult;
use crate::merge::fold;
use crate::value::{Dict, Value};

/// The default pattern splitting variable names into path segments.
pub const DEFAULT_SPLIT: &str = "__";

/// Configuration source reading process environment variables.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
#[derive(Clone, Debug)]
pub struct EnvLoader {
    prefix: Option<String>,
    split: String,
}

impl EnvLoader {
    /// Creates a loader reading every environment variable.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::EnvLoader;
    /// let env = EnvLoader::raw();
    /// let _ = env;
    /// ```
    #[must_use]
    pub fn raw() -> Self {
        Self {
            prefix: None,
            split: DEFAULT_SPLIT.to_owned(),
        }
    }

    /// Creates a loader reading only variables that start with `prefix`.
    ///
    /// The prefix must lead the variable name and is stripped before the
    /// remainder is split: with prefix `APP_`, `APP_HOST` contributes the
    /// key `HOST` whilst `XAPP_HOST` is ignored. A variable whose whole
    /// name is the prefix is skipped.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::EnvLoader;
    /// let env = EnvLoader::prefixed("APP_");
    /// let _ = env;
    /// ```
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
            split: DEFAULT_SPLIT.to_owned(),
        }
    }

    /// Splits variable names at `pattern` instead of the default `__`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::EnvLoader;
    /// let env = EnvLoader::prefixed("APP_").split("_");
    /// let _ = env;
    /// ```
    #[must_use]
    pub fn split(mut self, pattern: &str) -> Self {
        self.split = pattern.to_owned();
        self
    }

    /// Builds the single-path document contributed by one variable, or
    /// `None` when the variable is out of scope for this loader.
    fn document_for(&self, name: &str, value: &str) -> Option<Dict> {
        let key = match &self.prefix {
            Some(prefix) => name.strip_prefix(prefix)?,
            None => name,
        };
        if key.is_empty() {
            return None;
        }
        Some(nest(key, &self.split, value))
    }
}

/// Turns a split variable name into a nested single-leaf document.
///
/// Empty segments would make unaddressable keys, so a leading or trailing
/// pattern leaves the remainder whole instead of splitting further.
fn nest(key: &str, pattern: &str, value: &str) -> Dict {
    match key.split_once(pattern) {
        Some((head, tail)) if !head.is_empty() && !tail.is_empty() => {
            Dict::from([(head.to_owned(), Value::Dict(nest(tail, pattern, value)))])
        }
        _ => Dict::from([(key.to_owned(), Value::from(value))]),
    }
}

impl Loader for EnvLoader {
    fn load(&self) -> StrataResult<Dict> {
        let mut document = Dict::new();
        for (raw_name, raw_value) in env::vars_os() {
            let (Some(name), Some(value)) = (raw_name.to_str(), raw_value.to_str()) else {
                continue;
            };
            let Some(leaf) = self.document_for(name, value) else {
                continue;
            };
            document = fold(&leaf, &document);
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{EnvLoader, nest};
    use crate::value::{Dict, Value};

    #[test]
    fn nest_keeps_single_segments_flat() {
        assert_eq!(
            nest("HOST", "__", "localhost"),
            Dict::from([("HOST".to_owned(), Value::from("localhost"))]),
        );
    }

    #[test]
    fn nest_builds_one_level_per_segment() {
        let document = nest("DB__POOL__SIZE", "__", "8");
        let size = document
            .get("DB")
            .and_then(Value::as_dict)
            .and_then(|db| db.get("POOL"))
            .and_then(Value::as_dict)
            .and_then(|pool| pool.get("SIZE"));
        assert_eq!(size, Some(&Value::from("8")));
    }

    #[rstest]
    #[case::trailing("DB__", "DB__")]
    #[case::leading("__DB", "__DB")]
    fn nest_keeps_degenerate_names_whole(#[case] name: &str, #[case] expected_key: &str) {
        let document = nest(name, "__", "v");
        assert_eq!(
            document,
            Dict::from([(expected_key.to_owned(), Value::from("v"))]),
        );
    }

    #[test]
    fn document_for_strips_a_leading_prefix() {
        let loader = EnvLoader::prefixed("APP_");
        let document = loader.document_for("APP_HOST", "localhost");
        assert_eq!(
            document,
            Some(Dict::from([("HOST".to_owned(), Value::from("localhost"))])),
        );
    }

    #[rstest]
    #[case::interior_prefix("XAPP_HOST")]
    #[case::prefix_only("APP_")]
    fn document_for_skips_out_of_scope_names(#[case] name: &str) {
        let loader = EnvLoader::prefixed("APP_");
        assert_eq!(loader.document_for(name, "v"), None);
    }
}
