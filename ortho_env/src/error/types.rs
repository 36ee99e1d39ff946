//! Primary error enum for environment loading flows.

use std::collections::TryReserveError;
use std::num::ParseIntError;

use thiserror::Error;

use crate::{ParseError, UnsupportedKind};

/// Errors that can occur while loading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// A field's type cannot be discovered or assigned.
    #[error("unsupported type {type_name} ({kind})")]
    UnsupportedKind {
        /// Rust type name of the offending field.
        type_name: String,
        /// Why the type is rejected.
        kind: UnsupportedKind,
    },

    /// A fixed-array or sequence index in a variable name is not a
    /// non-negative integer.
    #[error("invalid index '{key}' in environment variable {variable}: {source}")]
    InvalidIndex {
        /// The offending key, as read from the variable name.
        key: String,
        /// Variable that carried the key.
        variable: String,
        /// Integer conversion failure.
        #[source]
        source: ParseIntError,
    },

    /// A fixed-array index is not below the array's length.
    #[error("index {index} in environment variable {variable} exceeds array length {len}")]
    IndexOutOfBounds {
        /// The parsed index.
        index: usize,
        /// Declared array length.
        len: usize,
        /// Variable that carried the index.
        variable: String,
    },

    /// A sequence index is too large to grow the sequence to.
    #[error("index {index} is too large for a sequence of {type_name}")]
    SequenceTooLarge {
        /// The parsed index.
        index: usize,
        /// Rust type name of the sequence element.
        type_name: &'static str,
        /// Allocation failure, absent when the length itself overflows.
        #[source]
        source: Option<TryReserveError>,
    },

    /// No parser is registered for a leaf or map key type.
    #[error("no parser registered for type {type_name}")]
    MissingParser {
        /// Rust type name lacking a parser.
        type_name: &'static str,
    },

    /// A parser rejected a raw value.
    #[error("failed to parse '{raw}' as {type_name}: {source}")]
    Parse {
        /// Destination type.
        type_name: &'static str,
        /// Raw value read from the environment.
        raw: String,
        /// Underlying parser error.
        #[source]
        source: ParseError,
    },

    /// Discovery descended further than the nesting limit.
    #[error("configuration nesting too deep at '{path}'")]
    RecursionLimit {
        /// Path reached when the limit was hit.
        path: String,
    },
}
