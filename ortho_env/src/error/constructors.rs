//! Convenience constructors for `EnvError`.

use std::collections::TryReserveError;
use std::num::ParseIntError;

use super::EnvError;
use crate::{ParseError, Path, UnsupportedKind};

impl EnvError {
    /// Error for a type discovery cannot process.
    #[must_use]
    pub fn unsupported(type_name: impl Into<String>, kind: UnsupportedKind) -> Self {
        Self::UnsupportedKind {
            type_name: type_name.into(),
            kind,
        }
    }

    /// Error for an index key that is not a non-negative integer.
    #[must_use]
    pub fn invalid_index(
        key: impl Into<String>,
        variable: impl Into<String>,
        source: ParseIntError,
    ) -> Self {
        Self::InvalidIndex {
            key: key.into(),
            variable: variable.into(),
            source,
        }
    }

    /// Error for an array index at or past the declared length.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, len: usize, variable: impl Into<String>) -> Self {
        Self::IndexOutOfBounds {
            index,
            len,
            variable: variable.into(),
        }
    }

    /// Error for a sequence that cannot grow to hold `index`.
    #[must_use]
    pub const fn sequence_too_large(
        index: usize,
        type_name: &'static str,
        source: Option<TryReserveError>,
    ) -> Self {
        Self::SequenceTooLarge {
            index,
            type_name,
            source,
        }
    }

    /// Error for a type with no registered parser.
    #[must_use]
    pub const fn missing_parser(type_name: &'static str) -> Self {
        Self::MissingParser { type_name }
    }

    /// Error for a parser rejecting `raw`.
    #[must_use]
    pub fn parse(type_name: &'static str, raw: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            type_name,
            raw: raw.into(),
            source,
        }
    }

    /// Error for discovery exceeding the nesting limit at `path`.
    #[must_use]
    pub fn recursion_limit(path: &Path) -> Self {
        Self::RecursionLimit {
            path: path.to_string(),
        }
    }
}
