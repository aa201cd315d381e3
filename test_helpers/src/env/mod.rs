//! Helpers for safely mutating environment variables in tests.
//!
//! The process environment is global state, so every mutation here goes
//! through one re-entrant mutex and returns an RAII guard that restores
//! the prior value on drop (removing the variable if it was absent).
//! Guards for the same key stack and restore in LIFO order. The mutex is
//! held only during each mutation, so unrelated keys may interleave; take
//! [`lock`] or build an [`EnvScope`] when a test needs exclusive access to
//! shared keys for its whole duration.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _guard = env::set_var("KEY", "VALUE");
//! // `KEY` reads as `VALUE` until the guard drops.
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        if let Some(value) = self.original.take() {
            // SAFETY: `ENV_MUTEX` is held for the restoration.
            unsafe { raw_set_var(&self.key, &value) };
        } else {
            // SAFETY: `ENV_MUTEX` is held for the restoration.
            unsafe { raw_remove_var(&self.key) };
        }
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

/// RAII guard that serialises environment access for its lifetime.
///
/// Hold one of these when a test performs several operations that must not
/// interleave with environment mutations from other tests.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let lock = env::lock();
/// let _guard = lock.set_var("KEY", "VALUE");
/// // Mutations stay serialised while `lock` is alive.
/// ```
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets an environment variable whilst the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        guarded_mutation_locked(
            key.into(),
            |k| unsafe { raw_set_var(k, value.as_ref()) },
            &self.guard,
        )
    }

    /// Removes an environment variable whilst the lock is held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        guarded_mutation_locked(key.into(), |k| unsafe { raw_remove_var(k) }, &self.guard)
    }
}

/// RAII scope that holds the environment lock whilst retaining guards.
///
/// Useful when a test adjusts several variables and needs the lock kept for
/// its whole duration so no other test interleaves.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::EnvScope::new_with(|lock| {
///     vec![lock.set_var("FOO", "1"), lock.remove_var("BAR")]
/// });
/// ```
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    _lock: EnvVarLock,
    guards: Vec<EnvVarGuard>,
}

impl EnvScope {
    /// Creates a scope that takes the global lock and retains `guards`.
    pub fn new(guards: Vec<EnvVarGuard>) -> Self {
        Self {
            _lock: lock(),
            guards,
        }
    }

    /// Creates a scope whose guards are built whilst the lock is held.
    ///
    /// The builder must use the provided lock's methods rather than the
    /// standalone helpers so the mutations happen under the already-held
    /// lock.
    pub fn new_with<F>(builder: F) -> Self
    where
        F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
    {
        let held = lock();
        let guards = builder(&held);
        Self {
            _lock: held,
            guards,
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Guard restoration must happen while the environment lock is held.
        let guards = std::mem::take(&mut self.guards);
        drop(guards);
    }
}

/// Sets an environment variable and returns a guard restoring its prior
/// value.
///
/// Mutation and restoration each take the global mutex; operations on other
/// keys may interleave in between.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::set_var("FOO", "bar");
/// assert!(matches!(std::env::var("FOO"), Ok(ref value) if value == "bar"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    guarded_mutation(key, |k| unsafe { raw_set_var(k, value.as_ref()) })
}

/// Removes an environment variable and returns a guard restoring its prior
/// value.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::remove_var("FOO");
/// assert!(std::env::var("FOO").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    guarded_mutation(key, |k| unsafe { raw_remove_var(k) })
}

/// Acquires the global environment lock for the lifetime of the guard.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _lock = env::lock();
/// let _guard = env::set_var("KEY", "VALUE");
/// ```
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        guard: ENV_MUTEX.lock(),
    }
}

/// Creates a scope that takes the global lock and retains `guards`.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::scope(vec![env::remove_var("FOO")]);
/// ```
pub fn scope(guards: Vec<EnvVarGuard>) -> EnvScope {
    EnvScope::new(guards)
}

/// Creates a scope whose guards are built whilst the lock is held.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::scope_with(|lock| vec![lock.remove_var("FOO")]);
/// ```
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    EnvScope::new_with(builder)
}

/// Runs a closure whilst holding the global environment lock.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// env::with_lock(|| {
///     let _guard = env::set_var("KEY", "VALUE");
/// });
/// ```
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}

/// Wrapper around `std::env::set_var`.
///
/// # Safety
///
/// Callers must ensure the global environment is synchronised.
unsafe fn raw_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// Wrapper around `std::env::remove_var`.
///
/// # Safety
///
/// Callers must ensure the global environment is synchronised.
unsafe fn raw_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

fn guarded_mutation<K, F>(key: K, mutator: F) -> EnvVarGuard
where
    K: Into<String>,
    F: FnOnce(&str),
{
    let owned_key = key.into();
    let guard = ENV_MUTEX.lock();
    guarded_mutation_locked(owned_key, mutator, &guard)
}

fn guarded_mutation_locked<F>(
    key: String,
    mutator: F,
    _guard: &ReentrantMutexGuard<'static, ()>,
) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let original = env::var_os(&key);
    mutator(&key);
    EnvVarGuard { key, original }
}
