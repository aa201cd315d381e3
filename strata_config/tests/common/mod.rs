//! Shared fixtures for integration tests.

use strata_config::{Dict, Loader, StrataResult, Value};

/// Builds a document from literal entries.
pub fn dict<const N: usize>(entries: [(&str, Value); N]) -> Dict {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Loader serving a fixed document.
pub struct DocLoader(pub Dict);

impl Loader for DocLoader {
    fn load(&self) -> StrataResult<Dict> {
        Ok(self.0.clone())
    }
}
