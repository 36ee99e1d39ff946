//! Environment variable names derived from record paths.
//!
//! Every segment of a [`Path`] is broken into words at case transitions
//! (`IamGroot` becomes `Iam` and `Groot`, `IAmBatman` becomes `I`, `Am` and
//! `Batman`) and at `_` or `-`, so Rust's `snake_case` field names split the
//! same way as `PascalCase` ones. The words of the prefix and of every
//! segment are joined with the separator and upper-cased.

use heck::ToShoutySnakeCase;

use crate::Path;

/// Prefix and separator used to derive variable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvNaming {
    prefix: String,
    separator: String,
}

impl EnvNaming {
    /// Creates a naming scheme. An empty `prefix` adds no leading words.
    #[must_use]
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// The configured prefix, as supplied.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The configured separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Derives the variable name for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_env::{EnvNaming, Path};
    ///
    /// let naming = EnvNaming::new("YOUPI", "_");
    /// let path = Path::from_segments(["Foo", "IamGroot", "IAmBatman"]);
    /// assert_eq!(naming.var_name(&path), "YOUPI_FOO_IAM_GROOT_I_AM_BATMAN");
    /// ```
    #[must_use]
    pub fn var_name(&self, path: &Path) -> String {
        let leading = (!self.prefix.is_empty()).then_some(self.prefix.as_str());
        leading
            .into_iter()
            .chain(path.iter().map(String::as_str))
            .flat_map(split_case)
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for EnvNaming {
    fn default() -> Self {
        Self::new("", "_")
    }
}

/// Splits `segment` into upper-cased words at case and punctuation boundaries.
///
/// # Examples
///
/// ```
/// use ortho_env::naming::split_case;
///
/// assert_eq!(split_case("IAmBatman"), ["I", "AM", "BATMAN"]);
/// assert_eq!(split_case("pool_size"), ["POOL", "SIZE"]);
/// assert_eq!(split_case("0"), ["0"]);
/// ```
#[must_use]
pub fn split_case(segment: &str) -> Vec<String> {
    segment
        .to_shouty_snake_case()
        .split('_')
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}
