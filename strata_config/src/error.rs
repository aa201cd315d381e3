//! Primary error enum for configuration loading and lookup flows.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type StrataResult<T> = Result<T, StrataError>;

/// Errors that can occur while loading or reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// The requested key is absent from the loaded configuration.
    #[error("configuration key `{key}` was not found")]
    KeyNotFound {
        /// Normalised key that was looked up.
        key: String,
    },

    /// The key exists but holds a value of an incompatible kind.
    #[error("configuration key `{key}` holds a value of type {actual}, not {expected}")]
    TypeMismatch {
        /// Normalised key that was looked up.
        key: String,
        /// Kind the accessor asked for.
        expected: &'static str,
        /// Kind the store actually holds.
        actual: &'static str,
    },

    /// The key holds a string that does not parse as the requested kind.
    #[error("configuration key `{key}` holds `{value}`, which does not parse as {expected}")]
    InvalidFormat {
        /// Normalised key that was looked up.
        key: String,
        /// Stored string that failed to parse.
        value: String,
        /// Kind the accessor asked for.
        expected: &'static str,
    },

    /// Error originating from a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported while reading or parsing the file.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A registered source failed to produce its document.
    #[error("configuration loader failed: {source}")]
    Loader {
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StrataError {
    /// Constructs a [`StrataError::File`] from a path and an underlying error.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::StrataError;
    /// let e = StrataError::file("app.json", std::io::Error::other("boom"));
    /// assert!(matches!(e, StrataError::File { .. }));
    /// ```
    #[must_use]
    pub fn file(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::File {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Constructs a [`StrataError::Loader`] from an underlying error.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::StrataError;
    /// let e = StrataError::loader(std::io::Error::other("socket closed"));
    /// assert!(matches!(e, StrataError::Loader { .. }));
    /// ```
    #[must_use]
    pub fn loader(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Loader {
            source: source.into(),
        }
    }
}
