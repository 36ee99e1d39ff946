//! String-to-value conversion keyed by destination type.
//!
//! The engine never decides how a string becomes a typed value. It asks a
//! [`ParserRegistry`], which maps each destination type to a [`Parser`].
//! A leaf or map key whose type has no registered parser is an error.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::EnvError;

/// Error produced by a parser.
pub type ParseError = Box<dyn std::error::Error + Send + Sync>;

/// Converts a raw string into a `T`.
pub trait Parser<T>: Send + Sync {
    /// Parses `raw`.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure when `raw` is not a valid `T`.
    fn parse(&self, raw: &str) -> Result<T, ParseError>;
}

impl<T, F> Parser<T> for F
where
    F: Fn(&str) -> Result<T, ParseError> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<T, ParseError> {
        self(raw)
    }
}

/// Parser delegating to `T`'s [`FromStr`] implementation.
pub struct FromStrParser<T>(PhantomData<fn() -> T>);

impl<T> FromStrParser<T> {
    /// Creates the parser.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromStrParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromStrParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FromStrParser")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Parser<T> for FromStrParser<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn parse(&self, raw: &str) -> Result<T, ParseError> {
        raw.parse::<T>().map_err(Into::into)
    }
}

/// Error for boolean literals outside the accepted set.
#[derive(Debug, thiserror::Error)]
#[error("expected one of 1, t, true, 0, f or false")]
pub struct InvalidBool;

/// Parses booleans the way command-line flags usually accept them.
///
/// `1`, `t` and `true` are true; `0`, `f` and `false` are false. Letters
/// are matched case-insensitively and surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`InvalidBool`] for any other input.
pub fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(Box::new(InvalidBool)),
    }
}

struct Entry {
    type_name: &'static str,
    parser: Box<dyn Any + Send + Sync>,
}

/// Parsers keyed by destination type.
///
/// # Examples
///
/// ```
/// use ortho_env::ParserRegistry;
///
/// let mut parsers = ParserRegistry::new();
/// parsers.register_from_str::<u16>();
/// assert_eq!(parsers.parse::<u16>("8080").ok(), Some(8080));
/// assert!(parsers.parse::<i32>("1").is_err());
/// ```
#[derive(Default)]
pub struct ParserRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry covering the primitive and common standard types.
    ///
    /// Every integer and float primitive, `char`, `String`, `PathBuf`, IP
    /// and socket addresses parse through [`FromStr`]; `bool` uses
    /// [`parse_bool`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<bool>(parse_bool);
        registry.register_from_str::<char>();
        registry.register_from_str::<String>();
        registry.register_from_str::<PathBuf>();
        registry.register_from_str::<IpAddr>();
        registry.register_from_str::<Ipv4Addr>();
        registry.register_from_str::<Ipv6Addr>();
        registry.register_from_str::<SocketAddr>();
        registry.register_from_str::<i8>();
        registry.register_from_str::<i16>();
        registry.register_from_str::<i32>();
        registry.register_from_str::<i64>();
        registry.register_from_str::<i128>();
        registry.register_from_str::<isize>();
        registry.register_from_str::<u8>();
        registry.register_from_str::<u16>();
        registry.register_from_str::<u32>();
        registry.register_from_str::<u64>();
        registry.register_from_str::<u128>();
        registry.register_from_str::<usize>();
        registry.register_from_str::<f32>();
        registry.register_from_str::<f64>();
        registry
    }

    /// Registers `parser` for `T`, replacing any previous parser.
    pub fn register<T: 'static>(&mut self, parser: impl Parser<T> + 'static) -> &mut Self {
        let boxed: Box<dyn Parser<T>> = Box::new(parser);
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: std::any::type_name::<T>(),
                parser: Box::new(boxed),
            },
        );
        self
    }

    /// Registers a [`FromStrParser`] for `T`.
    pub fn register_from_str<T>(&mut self) -> &mut Self
    where
        T: FromStr + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.register::<T>(FromStrParser::<T>::new())
    }

    /// Whether a parser is registered for `T`.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Names of the registered types, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }

    /// Converts `raw` into a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingParser`] when `T` has no parser and
    /// [`EnvError::Parse`] when the parser rejects `raw`.
    pub fn parse<T: 'static>(&self, raw: &str) -> Result<T, EnvError> {
        let type_name = std::any::type_name::<T>();
        let parser = self
            .entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.parser.downcast_ref::<Box<dyn Parser<T>>>())
            .ok_or_else(|| EnvError::missing_parser(type_name))?;
        parser
            .parse(raw)
            .map_err(|source| EnvError::parse(type_name, raw, source))
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
