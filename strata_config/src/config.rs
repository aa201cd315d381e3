//! Aggregated configuration store.
//!
//! [`Config`] owns the registered sources and the flattened document built
//! from them. Sources are consulted in registration order, so values from a
//! later source override earlier ones. Loading is all-or-nothing: the first
//! source error aborts the pass and the previously loaded store stays
//! intact.

use std::fmt;

use crate::Loader;
use crate::binder::Binder;
use crate::error::{StrataError, StrataResult};
use crate::flatten::flatten;
use crate::key::{normalise, normalise_path};
use crate::merge::fold;
use crate::value::{Dict, Value};

/// Layered configuration aggregated from registered sources.
///
/// A loaded configuration is immutable until the next [`load`] pass, so it
/// may be read from several threads at once without locking.
///
/// [`load`]: Config::load
///
/// # Examples
///
/// ```rust
/// use strata_config::{Config, Dict, Loader, StrataResult, Value};
///
/// struct Defaults;
///
/// impl Loader for Defaults {
///     fn load(&self) -> StrataResult<Dict> {
///         Ok(Dict::from([("port".to_owned(), Value::from(8080_i64))]))
///     }
/// }
///
/// # fn main() -> StrataResult<()> {
/// let mut config = Config::new();
/// config.add(Defaults);
/// config.load()?;
/// assert_eq!(config.get_int("port")?, 8080);
/// # Ok(())
/// # }
/// ```
pub struct Config {
    loaders: Vec<Box<dyn Loader + Send + Sync>>,
    store: Dict,
    delimiter: String,
}

impl Config {
    /// Creates an empty configuration using the default `:` path delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delimiter(crate::DEFAULT_DELIMITER)
    }

    /// Creates an empty configuration whose flattened keys join path
    /// segments with `delimiter`.
    #[must_use]
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            loaders: Vec::new(),
            store: Dict::new(),
            delimiter: delimiter.into(),
        }
    }

    /// Registers a source.
    ///
    /// Sources are consulted in registration order on the next [`load`]
    /// pass; a source added later overrides keys set by earlier ones. A
    /// source must be `Send + Sync` so the configuration holding it stays
    /// shareable across threads.
    ///
    /// [`load`]: Config::load
    pub fn add(&mut self, loader: impl Loader + Send + Sync + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Loads every registered source and rebuilds the flattened store.
    ///
    /// Each document has its keys normalised as it arrives, then documents
    /// merge in registration order via [`fold`] and the merged tree is
    /// flattened into the store. Normalising before the merge means a later
    /// source overrides an earlier one even when the two spell the key
    /// differently, such as an environment variable's `DB` over a file's
    /// `db`. When two sibling keys within one document collapse onto the
    /// same spelling, the lexicographically later one wins and a warning is
    /// emitted.
    ///
    /// # Errors
    ///
    /// Returns the first source error verbatim. The store keeps the result
    /// of the last successful load; a failed pass changes nothing.
    pub fn load(&mut self) -> StrataResult<()> {
        let mut merged = Dict::new();
        for loader in &self.loaders {
            let document = normalise_document(&loader.load()?);
            merged = fold(&document, &merged);
        }
        self.store = flatten(&merged, &self.delimiter);
        Ok(())
    }

    /// Looks up a string value.
    ///
    /// The key is normalised before lookup, so `DB:HOST`, `Db:Host`, and
    /// `db:h_ost` all address the same entry.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::KeyNotFound`] when the key is absent and
    /// [`StrataError::TypeMismatch`] when it holds anything but a string.
    pub fn get_string(&self, key: &str) -> StrataResult<String> {
        let flat_key = normalise_path(key, &self.delimiter);
        match self.entry(&flat_key)? {
            Value::String(text) => Ok(text.clone()),
            other => Err(mismatch(flat_key, "a string", other)),
        }
    }

    /// Looks up an integer value.
    ///
    /// String values are parsed, so `"7"` reads as `7`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::KeyNotFound`] when the key is absent,
    /// [`StrataError::InvalidFormat`] when it holds a string that does not
    /// parse as an integer, and [`StrataError::TypeMismatch`] for any other
    /// kind, including floats.
    pub fn get_int(&self, key: &str) -> StrataResult<i64> {
        let flat_key = normalise_path(key, &self.delimiter);
        match self.entry(&flat_key)? {
            Value::Integer(number) => Ok(*number),
            Value::String(text) => text.parse().map_err(|_| StrataError::InvalidFormat {
                key: flat_key,
                value: text.clone(),
                expected: "an integer",
            }),
            other => Err(mismatch(flat_key, "an integer", other)),
        }
    }

    /// Looks up a floating-point value.
    ///
    /// Integer values widen to floats and string values are parsed.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::KeyNotFound`] when the key is absent,
    /// [`StrataError::InvalidFormat`] when it holds a string that does not
    /// parse as a float, and [`StrataError::TypeMismatch`] for booleans and
    /// mappings.
    pub fn get_float(&self, key: &str) -> StrataResult<f64> {
        let flat_key = normalise_path(key, &self.delimiter);
        match self.entry(&flat_key)? {
            Value::Float(number) => Ok(*number),
            Value::Integer(number) => {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "stored integers coerce to floats on float lookups"
                )]
                let widened = *number as f64;
                Ok(widened)
            }
            Value::String(text) => text.parse().map_err(|_| StrataError::InvalidFormat {
                key: flat_key,
                value: text.clone(),
                expected: "a float",
            }),
            other => Err(mismatch(flat_key, "a float", other)),
        }
    }

    /// Looks up a string value, aborting on failure.
    ///
    /// # Panics
    ///
    /// Panics with the underlying error message when [`Config::get_string`]
    /// would return an error.
    #[must_use]
    #[track_caller]
    pub fn must_get_string(&self, key: &str) -> String {
        unwrap_or_abort(self.get_string(key))
    }

    /// Looks up an integer value, aborting on failure.
    ///
    /// # Panics
    ///
    /// Panics with the underlying error message when [`Config::get_int`]
    /// would return an error.
    #[must_use]
    #[track_caller]
    pub fn must_get_int(&self, key: &str) -> i64 {
        unwrap_or_abort(self.get_int(key))
    }

    /// Looks up a floating-point value, aborting on failure.
    ///
    /// # Panics
    ///
    /// Panics with the underlying error message when [`Config::get_float`]
    /// would return an error.
    #[must_use]
    #[track_caller]
    pub fn must_get_float(&self, key: &str) -> f64 {
        unwrap_or_abort(self.get_float(key))
    }

    /// Resolves a batch of keys into their destinations atomically.
    ///
    /// The closure registers destinations on the [`Binder`]. Every key is
    /// resolved before any destination is written, so either all
    /// destinations receive their values or none change.
    ///
    /// # Errors
    ///
    /// Returns the first lookup error. No destination is modified when any
    /// lookup fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::{Config, Dict, Loader, StrataResult, Value};
    ///
    /// struct Defaults;
    ///
    /// impl Loader for Defaults {
    ///     fn load(&self) -> StrataResult<Dict> {
    ///         Ok(Dict::from([
    ///             ("host".to_owned(), Value::from("localhost")),
    ///             ("port".to_owned(), Value::from(5432_i64)),
    ///         ]))
    ///     }
    /// }
    ///
    /// # fn main() -> StrataResult<()> {
    /// let mut config = Config::new();
    /// config.add(Defaults);
    /// config.load()?;
    ///
    /// let mut host = String::new();
    /// let mut port = 0_i64;
    /// config.bind(|binder| {
    ///     binder.bind_string(&mut host, "host");
    ///     binder.bind_int(&mut port, "port");
    /// })?;
    ///
    /// assert_eq!(host, "localhost");
    /// assert_eq!(port, 5432);
    /// # Ok(())
    /// # }
    /// ```
    pub fn bind<'a, F>(&self, register: F) -> StrataResult<()>
    where
        F: FnOnce(&mut Binder<'a>),
    {
        let mut binder = Binder::new();
        register(&mut binder);
        binder.execute(self)
    }

    /// Resolves a batch of keys into their destinations, aborting on
    /// failure.
    ///
    /// # Panics
    ///
    /// Panics with the underlying error message when [`Config::bind`] would
    /// return an error.
    #[track_caller]
    pub fn must_bind<'a, F>(&self, register: F)
    where
        F: FnOnce(&mut Binder<'a>),
    {
        unwrap_or_abort(self.bind(register));
    }

    /// Returns the number of flattened entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` when no entries have been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn entry(&self, flat_key: &str) -> StrataResult<&Value> {
        self.store.get(flat_key).ok_or_else(|| StrataError::KeyNotFound {
            key: flat_key.to_owned(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("loaders", &self.loaders.len())
            .field("store", &self.store)
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

fn mismatch(key: String, expected: &'static str, value: &Value) -> StrataError {
    StrataError::TypeMismatch {
        key,
        expected,
        actual: value.kind(),
    }
}

/// Rewrites every key in `document` to its normalised spelling, recursing
/// into nested mappings.
///
/// Sibling keys that collapse onto the same spelling merge when both hold
/// mappings; otherwise the lexicographically later sibling wins and a
/// warning is emitted, since the document author almost certainly did not
/// intend the collision.
fn normalise_document(document: &Dict) -> Dict {
    let mut normalised = Dict::new();
    for (key, value) in document {
        let flat_key = normalise(key);
        let incoming = match value {
            Value::Dict(nested) => Value::Dict(normalise_document(nested)),
            scalar => scalar.clone(),
        };
        let combined = match (normalised.remove(&flat_key), incoming) {
            (Some(Value::Dict(existing)), Value::Dict(overlay)) => {
                Value::Dict(fold(&overlay, &existing))
            }
            (Some(_), replacement) => {
                tracing::warn!(
                    original = %key,
                    normalised = %flat_key,
                    "configuration keys collide after normalisation"
                );
                replacement
            }
            (None, entry) => entry,
        };
        normalised.insert(flat_key, combined);
    }
    normalised
}

#[track_caller]
fn unwrap_or_abort<T>(result: StrataResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("configuration error: {error}"),
    }
}
