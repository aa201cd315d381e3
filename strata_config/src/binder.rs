//! Atomic multi-key resolution.
//!
//! A [`Binder`] collects typed destinations during registration. Execution
//! runs in two phases: every key resolves first, then every destination is
//! written. A failure in the first phase stops the pass before anything is
//! committed, so destinations never observe a partial batch.

use std::fmt;

use crate::config::Config;
use crate::error::StrataResult;

struct Receiver<'a, T> {
    dest: &'a mut T,
    key: String,
    pending: Option<T>,
}

impl<'a, T> Receiver<'a, T> {
    fn new(dest: &'a mut T, key: impl Into<String>) -> Self {
        Self {
            dest,
            key: key.into(),
            pending: None,
        }
    }

    fn commit(&mut self) {
        if let Some(value) = self.pending.take() {
            *self.dest = value;
        }
    }
}

/// Collects typed destinations for one atomic resolution pass.
///
/// Obtained through [`Config::bind`], which executes the batch once the
/// registration closure returns.
pub struct Binder<'a> {
    strings: Vec<Receiver<'a, String>>,
    ints: Vec<Receiver<'a, i64>>,
    floats: Vec<Receiver<'a, f64>>,
}

impl<'a> Binder<'a> {
    pub(crate) const fn new() -> Self {
        Self {
            strings: Vec::new(),
            ints: Vec::new(),
            floats: Vec::new(),
        }
    }

    /// Registers a string destination for `key`.
    pub fn bind_string(&mut self, dest: &'a mut String, key: impl Into<String>) {
        self.strings.push(Receiver::new(dest, key));
    }

    /// Registers an integer destination for `key`.
    pub fn bind_int(&mut self, dest: &'a mut i64, key: impl Into<String>) {
        self.ints.push(Receiver::new(dest, key));
    }

    /// Registers a floating-point destination for `key`.
    pub fn bind_float(&mut self, dest: &'a mut f64, key: impl Into<String>) {
        self.floats.push(Receiver::new(dest, key));
    }

    /// Resolves every registered key, then writes every destination.
    ///
    /// Resolution order is strings, then integers, then floats, each in
    /// registration order; the first failure aborts the pass before any
    /// destination is written.
    pub(crate) fn execute(mut self, config: &Config) -> StrataResult<()> {
        for receiver in &mut self.strings {
            receiver.pending = Some(config.get_string(&receiver.key)?);
        }
        for receiver in &mut self.ints {
            receiver.pending = Some(config.get_int(&receiver.key)?);
        }
        for receiver in &mut self.floats {
            receiver.pending = Some(config.get_float(&receiver.key)?);
        }

        for receiver in &mut self.strings {
            receiver.commit();
        }
        for receiver in &mut self.ints {
            receiver.commit();
        }
        for receiver in &mut self.floats {
            receiver.commit();
        }
        Ok(())
    }
}

impl fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("strings", &self.strings.len())
            .field("ints", &self.ints.len())
            .field("floats", &self.floats.len())
            .finish()
    }
}
