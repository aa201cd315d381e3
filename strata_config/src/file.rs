//! JSON file source.
//!
//! Reads one JSON document from disk. The top level must be an object;
//! anything else fails deserialisation, as do arrays and nulls anywhere in
//! the tree. A source may be marked optional, in which case a missing file
//! contributes an empty document instead of an error.

use std::io;
use std::path::PathBuf;

use crate::Loader;
use crate::error::{StrataError, StrataResult};
use crate::value::Dict;

/// Configuration source reading a JSON document from disk.
#[derive(Clone, Debug)]
pub struct JsonFile {
    path: PathBuf,
    required: bool,
}

impl JsonFile {
    /// Creates a source whose file must exist.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::JsonFile;
    /// let source = JsonFile::required("settings.json");
    /// let _ = source;
    /// ```
    #[must_use]
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    /// Creates a source whose file may be absent.
    ///
    /// A missing file yields an empty document. Every other failure,
    /// including a present but malformed file, still errors.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::JsonFile;
    /// let source = JsonFile::optional("settings.local.json");
    /// let _ = source;
    /// ```
    #[must_use]
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

impl Loader for JsonFile {
    fn load(&self) -> StrataResult<Dict> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(error) if error.kind() == io::ErrorKind::NotFound && !self.required => {
                return Ok(Dict::new());
            }
            Err(error) => return Err(StrataError::file(&self.path, error)),
        };
        serde_json::from_str(&data).map_err(|error| StrataError::file(&self.path, error))
    }
}
