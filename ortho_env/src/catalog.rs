//! Listing the variable names a configuration type can read.
//!
//! The catalogue is derived from the shape alone, without consulting the
//! environment. Indexed positions cannot be enumerated statically and are
//! rendered as `<N>` for arrays and sequences and `<KEY>` for maps, so the
//! output suits help text and documentation.

use crate::discover::MAX_DEPTH;
use crate::naming::{EnvNaming, split_case};
use crate::shape::{RecordShape, Shape};
use crate::snapshot::unique;
use crate::{EnvError, Path};

const INDEX: &str = "<N>";
const KEY: &str = "<KEY>";

struct Catalogue<'a> {
    naming: &'a EnvNaming,
    names: Vec<String>,
}

impl Catalogue<'_> {
    fn render(&self, path: &Path) -> String {
        let leading = (!self.naming.prefix().is_empty()).then_some(self.naming.prefix());
        leading
            .into_iter()
            .flat_map(split_case)
            .chain(path.iter().flat_map(|segment| {
                if segment == INDEX || segment == KEY {
                    vec![segment.clone()]
                } else {
                    split_case(segment)
                }
            }))
            .collect::<Vec<_>>()
            .join(self.naming.separator())
    }

    fn walk(&mut self, shape: &Shape, path: &Path, depth: usize) -> Result<(), EnvError> {
        if depth > MAX_DEPTH {
            return Err(EnvError::recursion_limit(path));
        }
        let next = depth.saturating_add(1);
        match shape {
            Shape::Scalar { .. } => {
                let name = self.render(path);
                self.names.push(name);
                Ok(())
            }
            Shape::Indirection(target) => self.walk(&target(), path, next),
            Shape::Record(record) => self.walk_record(record, path, next),
            Shape::FixedArray { element, .. } | Shape::Sequence { element } => {
                self.walk(&element(), &path.child(INDEX), next)
            }
            Shape::Mapping { value, .. } => self.walk(&value(), &path.child(KEY), next),
            Shape::Unsupported { type_name, kind } => Err(EnvError::unsupported(*type_name, *kind)),
        }
    }

    fn walk_record(&mut self, record: &RecordShape, path: &Path, depth: usize) -> Result<(), EnvError> {
        for field in &record.fields {
            if field.abstract_capability {
                continue;
            }
            if field.embedded {
                self.walk(&(field.shape)(), path, depth)?;
            } else if field.exported {
                self.walk(&(field.shape)(), &path.child(field.name), depth)?;
            }
        }
        Ok(())
    }
}

/// Lists every variable name `shape` can read, in declaration order.
///
/// # Errors
///
/// Fails like discovery does: on unsupported field kinds and on nesting
/// deeper than [`MAX_DEPTH`], which includes every recursive type.
///
/// # Examples
///
/// ```
/// use ortho_env::{EnvNaming, Reflect, catalog::catalog};
/// use std::collections::HashMap;
///
/// #[derive(Default, Reflect)]
/// struct Settings {
///     pub port: u16,
///     pub upstreams: HashMap<String, String>,
/// }
///
/// let names = catalog(&EnvNaming::new("APP", "_"), &Settings::shape())?;
/// assert_eq!(names, ["APP_PORT", "APP_UPSTREAMS_<KEY>"]);
/// # Ok::<(), ortho_env::EnvError>(())
/// ```
pub fn catalog(naming: &EnvNaming, shape: &Shape) -> Result<Vec<String>, EnvError> {
    let mut catalogue = Catalogue {
        naming,
        names: Vec::new(),
    };
    catalogue.walk(shape, &Path::root(), 0)?;
    Ok(unique(catalogue.names))
}
