//! Guards for mutating the process environment in tests.
//!
//! Every mutation runs under a global re-entrant mutex and hands back an
//! [`EnvVarGuard`] that puts the variable back the way it was when dropped:
//! restored to its old value, or removed if it was absent.
//!
//! Guards for the same key restore in LIFO order. Single mutations only hold
//! the mutex while they run, so tests touching different keys can interleave.
//! Loads that scan the environment by prefix need the whole variable family
//! to stay put; take an [`EnvScope`] through [`isolate`] or [`scope_with`]
//! for those.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _guard = env::set_var("ORTHO_ENV_DOC_PORT", "8080");
//! assert_eq!(std::env::var("ORTHO_ENV_DOC_PORT").ok().as_deref(), Some("8080"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_set_var(key: &str, value: &OsStr) {
    unsafe { env::set_var(key, value) };
}

/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn env_remove_var(key: &str) {
    unsafe { env::remove_var(key) };
}

fn record_and_mutate<F>(
    key: String,
    mutate: F,
    _held: &ReentrantMutexGuard<'static, ()>,
) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let original = env::var_os(&key);
    mutate(&key);
    EnvVarGuard { key, original }
}

/// Restores one variable to its prior state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    /// Name of the guarded variable.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
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

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _held = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env_set_var(&self.key, &value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env_remove_var(&self.key) },
        }
    }
}

/// Exclusive access to the environment for as long as it lives.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let lock = env::lock();
/// let _port = lock.set_var("ORTHO_ENV_DOC_LOCK_PORT", "1");
/// let _host = lock.remove_var("ORTHO_ENV_DOC_LOCK_HOST");
/// ```
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    held: ReentrantMutexGuard<'static, ()>,
}

impl EnvLock {
    /// Sets `key` to `value`.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        record_and_mutate(
            key.into(),
            // SAFETY: `self.held` keeps `ENV_MUTEX` locked.
            |k| unsafe { env_set_var(k, value.as_ref()) },
            &self.held,
        )
    }

    /// Removes `key`.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        // SAFETY: `self.held` keeps `ENV_MUTEX` locked.
        record_and_mutate(key.into(), |k| unsafe { env_remove_var(k) }, &self.held)
    }

    /// Removes every variable whose name starts with `prefix`.
    ///
    /// Names that are not valid Unicode are left alone.
    #[must_use]
    pub fn clear_prefix(&self, prefix: &str) -> Vec<EnvVarGuard> {
        let doomed: Vec<String> = env::vars_os()
            .filter_map(|(name, _)| name.into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .collect();
        doomed.into_iter().map(|name| self.remove_var(name)).collect()
    }
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLock").finish_non_exhaustive()
    }
}

/// Holds the environment lock together with the guards it created.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping restores the guarded variables and releases the lock"]
pub struct EnvScope {
    _lock: EnvLock,
    guards: Vec<EnvVarGuard>,
}

impl EnvScope {
    /// Number of variables the scope will restore.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether the scope restores nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // LIFO, and while `_lock` is still held.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Sets `key` to `value` until the guard drops.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// {
///     let _guard = env::set_var("ORTHO_ENV_DOC_SET", "on");
///     assert!(std::env::var("ORTHO_ENV_DOC_SET").is_ok());
/// }
/// assert!(std::env::var("ORTHO_ENV_DOC_SET").is_err());
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    lock().set_var(key, value)
}

/// Removes `key` until the guard drops.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    lock().remove_var(key)
}

/// Acquires the global environment lock.
pub fn lock() -> EnvLock {
    EnvLock {
        held: ENV_MUTEX.lock(),
    }
}

/// Runs `builder` under the lock and keeps the lock until the scope drops.
///
/// Builders should mutate through the lock they are handed.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let scope = env::scope_with(|lock| {
///     vec![
///         lock.set_var("ORTHO_ENV_DOC_SCOPE_A", "1"),
///         lock.remove_var("ORTHO_ENV_DOC_SCOPE_B"),
///     ]
/// });
/// assert_eq!(scope.len(), 2);
/// ```
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvLock) -> Vec<EnvVarGuard>,
{
    let lock = lock();
    let guards = builder(&lock);
    EnvScope {
        _lock: lock,
        guards,
    }
}

/// Replaces the whole `prefix` family of variables with `vars`.
///
/// Every existing variable starting with `prefix` is removed first, so a
/// load scanning for that prefix sees exactly `vars`.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _scope = env::isolate("ORTHO_ENV_DOC_ISO_", [("ORTHO_ENV_DOC_ISO_PORT", "80")]);
/// let family: Vec<_> = std::env::vars()
///     .filter(|(name, _)| name.starts_with("ORTHO_ENV_DOC_ISO_"))
///     .collect();
/// assert_eq!(family, [("ORTHO_ENV_DOC_ISO_PORT".to_owned(), "80".to_owned())]);
/// ```
pub fn isolate<I, K, V>(prefix: &str, vars: I) -> EnvScope
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    scope_with(|lock| {
        let mut guards = lock.clear_prefix(prefix);
        guards.extend(vars.into_iter().map(|(key, value)| lock.set_var(key, value)));
        guards
    })
}

/// Runs `f` while holding the global environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _held = ENV_MUTEX.lock();
    f()
}
