//! Read-only views of environment variables.
//!
//! The engine never touches `std::env` directly. It reads through an
//! [`Environment`], so tests and alternative stores can supply a fixed
//! [`MapEnv`] while applications use [`ProcessEnv`].
//!
//! The free functions here derive the next path segment implied by a set of
//! variable names. Arrays, sequences and maps rely on them because their keys
//! cannot be enumerated from the type alone.

use std::collections::{BTreeMap, HashSet};

/// Key/value snapshot consulted during discovery.
pub trait Environment {
    /// Returns the value of `name`, if defined.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Returns every defined variable name starting with `prefix`.
    fn names_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// The current process environment.
///
/// Variables whose name or value is not valid Unicode are invisible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        std::env::vars_os()
            .filter_map(|(name, _)| name.into_string().ok())
            .filter(|name| name.starts_with(prefix))
            .collect()
    }
}

/// A fixed set of variables held in memory.
///
/// # Examples
///
/// ```
/// use ortho_env::{Environment, MapEnv};
///
/// let env: MapEnv = [("APP_PORT", "8080"), ("OTHER", "x")].into_iter().collect();
/// assert_eq!(env.lookup("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.names_with_prefix("APP_"), ["APP_PORT"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Adds or replaces a variable, returning the snapshot for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Copies the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

impl Environment for MapEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.vars
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }

    fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        (**self).names_with_prefix(prefix)
    }
}

/// Returns the text of `var` that follows `prefix` and `separator`.
///
/// An empty `prefix` strips nothing; a name that does not carry the prefix
/// is returned unchanged.
fn remainder<'a>(var: &'a str, prefix: &str, separator: &str) -> &'a str {
    if prefix.is_empty() {
        return var;
    }
    var.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(separator))
        .unwrap_or(var)
}

/// The first token of `var` after `prefix`, as it appears in the name.
fn next_token<'a>(var: &'a str, prefix: &str, separator: &str) -> &'a str {
    let rest = remainder(var, prefix, separator);
    if separator.is_empty() {
        return rest;
    }
    rest.split(separator).next().unwrap_or(rest)
}

/// Computes the distinct variable names one level below `prefix`.
///
/// For each name, the prefix and separator are stripped, the token up to
/// the next separator is kept and re-prefixed. Duplicates are removed,
/// keeping first-seen order.
///
/// # Examples
///
/// ```
/// use ortho_env::snapshot::next_level_vars;
///
/// let names = ["CONFIG_APP_BATMAN_FOO", "CONFIG_APP_ROBIN_FOO", "CONFIG_APP_BATMAN_BAR"];
/// assert_eq!(
///     next_level_vars("CONFIG_APP", "_", names),
///     ["CONFIG_APP_BATMAN", "CONFIG_APP_ROBIN"]
/// );
/// ```
#[must_use]
pub fn next_level_vars<I, S>(prefix: &str, separator: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    unique(names.into_iter().map(|name| {
        let token = next_token(name.as_ref(), prefix, separator);
        if prefix.is_empty() {
            token.to_owned()
        } else {
            format!("{prefix}{separator}{token}")
        }
    }))
}

/// Extracts the lower-cased key that `var` contributes below `prefix`.
///
/// # Examples
///
/// ```
/// use ortho_env::snapshot::key_from_var;
///
/// assert_eq!(key_from_var("CONFIG_APP_BATMAN_FOO", "CONFIG_APP", "_"), "batman");
/// assert_eq!(key_from_var("BATMAN", "", "_"), "batman");
/// ```
#[must_use]
pub fn key_from_var(var: &str, prefix: &str, separator: &str) -> String {
    next_token(var, prefix, separator).to_lowercase()
}

/// Removes duplicates, keeping the first occurrence of each string.
#[must_use]
pub fn unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
