//! Type-driven configuration loading from environment variables.
//!
//! `ortho_env` fills a nested configuration record from the process
//! environment, deriving each variable name from the record's structure.
//! A record field path such as `database.pool_size` under prefix `APP` reads
//! `APP_DATABASE_POOL_SIZE`; indirections (`Option`, `Box`) add nothing to the
//! name, array and sequence elements add a decimal index and map entries add
//! their key.
//!
//! Records describe themselves through the [`Reflect`] trait, usually via
//! `#[derive(Reflect)]` from the companion `ortho_env_macros` crate. Leaves
//! are converted by a [`ParserRegistry`]; [`EnvSource`] wires discovery and
//! assignment together.
//!
//! ```
//! use ortho_env::{EnvNaming, EnvSource, MapEnv, ParserRegistry, Reflect};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default, Reflect)]
//! struct Settings {
//!     pub port: u16,
//!     pub upstreams: HashMap<String, String>,
//!     secret: String,
//! }
//!
//! let env = MapEnv::new()
//!     .with("SVC_PORT", "8080")
//!     .with("SVC_UPSTREAMS_AUTH", "http://auth")
//!     .with("SVC_SECRET", "ignored");
//! let source = EnvSource::with_environment(
//!     EnvNaming::new("SVC", "_"),
//!     ParserRegistry::with_defaults(),
//!     env,
//! );
//! let settings: Settings = source.load()?;
//! assert_eq!(settings.port, 8080);
//! assert_eq!(settings.upstreams.get("auth").map(String::as_str), Some("http://auth"));
//! assert!(settings.secret.is_empty());
//! # Ok::<(), ortho_env::EnvError>(())
//! ```

extern crate self as ortho_env;

pub use ortho_env_macros::Reflect;

pub mod assign;
pub mod catalog;
pub mod discover;
mod error;
pub mod naming;
mod parser;
mod path;
mod reflect_impls;
mod shape;
pub mod snapshot;
mod source;

pub use discover::{DiscoveredValue, Discoverer};
pub use error::EnvError;
pub use naming::EnvNaming;
pub use parser::{FromStrParser, InvalidBool, ParseError, Parser, ParserRegistry, parse_bool};
pub use path::Path;
pub use shape::{
    DynShape, EntryFill, FieldShape, IndirectionMut, ListMut, MapMut, RecordMut, RecordShape,
    Reflect, ReflectMut, ScalarMut, Shape, ShapeFn, UnsupportedKind,
};
pub use snapshot::{Environment, MapEnv, ProcessEnv};
pub use source::{Command, EnvSource, Loader, Source, SourceLoader};

#[doc(hidden)]
pub mod __private {
    pub use crate::shape::embedded_field_mut;
}
