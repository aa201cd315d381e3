//! Layered configuration aggregation.
//!
//! Applications draw configuration from several places at once: baked-in
//! defaults, files on disk, the process environment. This crate merges
//! those sources into one flattened, normalised store and reads typed
//! values back out of it. Each source implements the [`Loader`] trait and
//! registers with a [`Config`]; registration order decides precedence,
//! with later sources overriding earlier ones key by key.
//!
//! Lookups are forgiving about spelling. Keys normalise to lowercase with
//! underscores removed, so `DB:HOST`, `Db:Host`, and `db:h_ost` address the
//! same entry regardless of which source supplied it.
//!
//! # Quick start
//!
//! ```rust
//! use strata_config::{Config, Dict, Loader, StrataResult, Value};
//!
//! struct Defaults;
//!
//! impl Loader for Defaults {
//!     fn load(&self) -> StrataResult<Dict> {
//!         Ok(Dict::from([(
//!             "db".to_owned(),
//!             Value::from(Dict::from([
//!                 ("host".to_owned(), Value::from("localhost")),
//!                 ("port".to_owned(), Value::from("5432")),
//!             ])),
//!         )]))
//!     }
//! }
//!
//! struct Overrides;
//!
//! impl Loader for Overrides {
//!     fn load(&self) -> StrataResult<Dict> {
//!         Ok(Dict::from([(
//!             "db".to_owned(),
//!             Value::from(Dict::from([("host".to_owned(), Value::from("db.internal"))])),
//!         )]))
//!     }
//! }
//!
//! fn main() -> StrataResult<()> {
//!     let mut config = Config::new();
//!     config.add(Defaults);
//!     config.add(Overrides);
//!     config.load()?;
//!
//!     assert_eq!(config.get_string("db:host")?, "db.internal");
//!     assert_eq!(config.get_int("db:port")?, 5432);
//!     Ok(())
//! }
//! ```
//!
//! Ready-made sources cover the common cases: [`JsonFile`] reads a JSON
//! document from disk and [`EnvLoader`] maps environment variables such as
//! `APP_DB__HOST` onto nested keys.

mod binder;
mod config;
mod env;
mod error;
mod file;
mod flatten;
mod key;
mod merge;
mod value;

pub use binder::Binder;
pub use config::Config;
pub use env::{DEFAULT_SPLIT, EnvLoader};
pub use error::{StrataError, StrataResult};
pub use file::JsonFile;
pub use flatten::{DEFAULT_DELIMITER, flatten};
pub use key::normalise;
pub use merge::fold;
pub use value::{Dict, Value};

/// A source of configuration data.
///
/// Implementations produce a complete nested document on every call.
/// Loaders hand keys over verbatim: flattening and normalisation happen
/// inside [`Config::load`], so a loader never needs to care about
/// delimiters or key spelling. Sources registered with a [`Config`] must
/// also be `Send + Sync`, which keeps the configuration shareable across
/// threads once loaded.
pub trait Loader {
    /// Produces this source's current document.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or parsed. The
    /// error aborts the surrounding [`Config::load`] pass unchanged.
    fn load(&self) -> StrataResult<Dict>;
}
