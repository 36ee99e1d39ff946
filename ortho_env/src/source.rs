//! Environment-backed configuration source.
//!
//! [`EnvSource`] ties the pieces together: it derives names with an
//! [`EnvNaming`], reads an [`Environment`], discovers the values a record's
//! shape can accept and assigns them through a [`ParserRegistry`]. It plugs
//! into a larger loading pipeline through the [`Loader`] and [`Source`]
//! traits.

use std::fmt;

use tracing::debug;

use crate::assign::Assigner;
use crate::discover::{DiscoveredValue, Discoverer};
use crate::naming::EnvNaming;
use crate::shape::{Reflect, Shape};
use crate::snapshot::{Environment, ProcessEnv};
use crate::{EnvError, ParserRegistry, Path};

/// Loads configuration into an existing record.
pub trait Loader {
    /// Populates `config` in place.
    ///
    /// # Errors
    ///
    /// Returns the first discovery or assignment failure.
    fn load_config(&self, config: &mut dyn Reflect) -> Result<(), EnvError>;
}

/// A named command carrying the record a pipeline populates.
pub struct Command<'a> {
    /// Command name.
    pub name: String,
    /// Human-readable summary.
    pub description: String,
    /// Record populated by sources.
    pub config: &'a mut dyn Reflect,
}

impl<'a> Command<'a> {
    /// Creates a command around `config`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config: &'a mut dyn Reflect,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config,
        }
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// One stage of a configuration pipeline.
pub trait Source {
    /// Populates the command's record and hands the command back.
    ///
    /// # Errors
    ///
    /// Returns the failure that stopped the stage.
    fn parse<'c>(&self, command: Command<'c>) -> Result<Command<'c>, EnvError>;
}

/// A [`Source`] that is also a [`Loader`].
pub trait SourceLoader: Loader + Source {}

impl<T: Loader + Source + ?Sized> SourceLoader for T {}

/// Populates records from environment variables.
///
/// # Examples
///
/// ```
/// use ortho_env::{EnvNaming, EnvSource, MapEnv, ParserRegistry, Reflect};
///
/// #[derive(Debug, Default, Reflect)]
/// struct Database {
///     pub url: String,
///     pub pool_size: Option<u32>,
/// }
///
/// #[derive(Debug, Default, Reflect)]
/// struct Settings {
///     pub database: Database,
///     pub replicas: Vec<String>,
/// }
///
/// let env = MapEnv::new()
///     .with("APP_DATABASE_URL", "postgres://localhost/app")
///     .with("APP_DATABASE_POOL_SIZE", "8")
///     .with("APP_REPLICAS_0", "db-a")
///     .with("APP_REPLICAS_1", "db-b");
/// let source = EnvSource::with_environment(
///     EnvNaming::new("APP", "_"),
///     ParserRegistry::with_defaults(),
///     env,
/// );
/// let settings: Settings = source.load()?;
/// assert_eq!(settings.database.pool_size, Some(8));
/// assert_eq!(settings.replicas, ["db-a", "db-b"]);
/// # Ok::<(), ortho_env::EnvError>(())
/// ```
pub struct EnvSource {
    naming: EnvNaming,
    parsers: ParserRegistry,
    env: Box<dyn Environment + Send + Sync>,
}

impl EnvSource {
    /// Creates a source reading the process environment.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        separator: impl Into<String>,
        parsers: ParserRegistry,
    ) -> Self {
        Self::with_environment(EnvNaming::new(prefix, separator), parsers, ProcessEnv)
    }

    /// Creates a source reading `env` instead of the process environment.
    #[must_use]
    pub fn with_environment(
        naming: EnvNaming,
        parsers: ParserRegistry,
        env: impl Environment + Send + Sync + 'static,
    ) -> Self {
        Self {
            naming,
            parsers,
            env: Box::new(env),
        }
    }

    /// The naming scheme in use.
    #[must_use]
    pub const fn naming(&self) -> &EnvNaming {
        &self.naming
    }

    /// The parsers used for leaves and map keys.
    #[must_use]
    pub const fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// Variable name derived for `path`.
    #[must_use]
    pub fn var_name(&self, path: &Path) -> String {
        self.naming.var_name(path)
    }

    /// Discovers the values defined for `C`.
    ///
    /// # Errors
    ///
    /// See [`Discoverer::discover`].
    pub fn discover<C: Reflect>(&self) -> Result<Vec<DiscoveredValue>, EnvError> {
        self.discover_shape(&C::shape())
    }

    /// Discovers the values defined for an arbitrary shape.
    ///
    /// # Errors
    ///
    /// See [`Discoverer::discover`].
    pub fn discover_shape(&self, shape: &Shape) -> Result<Vec<DiscoveredValue>, EnvError> {
        Discoverer::new(&self.naming, &*self.env).discover(shape, &Path::root())
    }

    /// Writes previously discovered values into `config`.
    ///
    /// # Errors
    ///
    /// See [`Assigner::assign`].
    pub fn assign(&self, config: &mut dyn Reflect, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        Assigner::new(&self.parsers).assign(config, values, &Path::root())
    }

    /// Builds a default `C` and populates it.
    ///
    /// # Errors
    ///
    /// Returns the first discovery or assignment failure.
    pub fn load<C: Reflect + Default>(&self) -> Result<C, EnvError> {
        let mut config = C::default();
        self.load_config(&mut config)?;
        Ok(config)
    }

    /// Lists every variable name `C` can read.
    ///
    /// # Errors
    ///
    /// See [`catalog`](crate::catalog::catalog).
    pub fn catalog<C: Reflect>(&self) -> Result<Vec<String>, EnvError> {
        crate::catalog::catalog(&self.naming, &C::shape())
    }
}

impl Loader for EnvSource {
    fn load_config(&self, config: &mut dyn Reflect) -> Result<(), EnvError> {
        let shape = config.dyn_shape();
        debug!(prefix = self.naming.prefix(), separator = self.naming.separator(), "loading from environment");
        let values = self.discover_shape(&shape)?;
        debug!(count = values.len(), "discovered environment values");
        self.assign(config, &values)
    }
}

impl Source for EnvSource {
    fn parse<'c>(&self, command: Command<'c>) -> Result<Command<'c>, EnvError> {
        debug!(command = %command.name, "applying environment source");
        self.load_config(&mut *command.config)?;
        Ok(command)
    }
}

impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("naming", &self.naming)
            .field("parsers", &self.parsers)
            .finish_non_exhaustive()
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new("", "_", ParserRegistry::with_defaults())
    }
}
