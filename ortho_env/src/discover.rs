//! Discovery of environment values for a configuration shape.
//!
//! The [`Discoverer`] walks a [`Shape`] depth-first, derives the variable
//! name of every reachable leaf and reads it from an [`Environment`].
//! Arrays, sequences and maps have no statically known keys, so their next
//! path segment is inferred from the names of the variables that are
//! actually defined.

use tracing::{debug, trace};

use crate::naming::EnvNaming;
use crate::shape::{RecordShape, Shape, ShapeFn};
use crate::snapshot::{Environment, key_from_var, next_level_vars};
use crate::{EnvError, Path};

/// Deepest shape nesting discovery will follow.
///
/// Self-referential records (`next: Option<Box<Self>>`) describe an
/// unbounded set of variable names; hitting the limit fails the load with
/// [`EnvError::RecursionLimit`].
pub const MAX_DEPTH: usize = 64;

/// A raw environment value and the path it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredValue {
    /// Unparsed value of the variable.
    pub raw: String,
    /// Location of the leaf inside the record.
    pub path: Path,
}

impl DiscoveredValue {
    /// Creates a discovered value.
    #[must_use]
    pub fn new(raw: impl Into<String>, path: Path) -> Self {
        Self {
            raw: raw.into(),
            path,
        }
    }
}

#[derive(Clone, Copy)]
enum Indexed {
    Array(usize),
    Sequence,
    Mapping,
}

/// Walks a shape and collects the values present in an environment.
pub struct Discoverer<'a> {
    naming: &'a EnvNaming,
    env: &'a dyn Environment,
}

impl<'a> Discoverer<'a> {
    /// Creates a discoverer reading `env` with the given naming scheme.
    #[must_use]
    pub const fn new(naming: &'a EnvNaming, env: &'a dyn Environment) -> Self {
        Self { naming, env }
    }

    /// Collects every value defined for `shape`, rooted at `path`.
    ///
    /// # Errors
    ///
    /// Fails on the first unsupported field kind, invalid or out-of-bounds
    /// index, or when nesting exceeds [`MAX_DEPTH`]. No partial result is
    /// returned.
    pub fn discover(&self, shape: &Shape, path: &Path) -> Result<Vec<DiscoveredValue>, EnvError> {
        let mut found = Vec::new();
        self.walk(shape, path, 0, &[], &mut found)?;
        Ok(found)
    }

    /// `reserved` holds the variable names owned by named fields of the
    /// records a flattened shape was reached through.
    fn walk(
        &self,
        shape: &Shape,
        path: &Path,
        depth: usize,
        reserved: &[String],
        found: &mut Vec<DiscoveredValue>,
    ) -> Result<(), EnvError> {
        if depth > MAX_DEPTH {
            return Err(EnvError::recursion_limit(path));
        }
        let next = depth.saturating_add(1);
        match shape {
            Shape::Scalar { .. } => {
                self.load_leaf(path, found);
                Ok(())
            }
            Shape::Indirection(target) => self.walk(&target(), path, next, reserved, found),
            Shape::Record(record) => self.walk_record(record, path, next, reserved, found),
            Shape::FixedArray { len, element } => {
                let kind = Indexed::Array(*len);
                self.walk_indexed(kind, *element, path, next, reserved, found)
            }
            Shape::Sequence { element } => {
                self.walk_indexed(Indexed::Sequence, *element, path, next, reserved, found)
            }
            Shape::Mapping { value, .. } => {
                self.walk_indexed(Indexed::Mapping, *value, path, next, reserved, found)
            }
            Shape::Unsupported { type_name, kind } => Err(EnvError::unsupported(*type_name, *kind)),
        }
    }

    fn walk_record(
        &self,
        record: &RecordShape,
        path: &Path,
        depth: usize,
        reserved: &[String],
        found: &mut Vec<DiscoveredValue>,
    ) -> Result<(), EnvError> {
        let mut claimed = Vec::new();
        if record.fields.iter().any(|field| field.embedded) {
            claimed.extend_from_slice(reserved);
            claimed.extend(
                record
                    .fields
                    .iter()
                    .filter(|field| field.exported && !field.embedded && !field.abstract_capability)
                    .map(|field| self.naming.var_name(&path.child(field.name))),
            );
        }
        for field in &record.fields {
            if field.abstract_capability {
                trace!(record = record.type_name, field = field.name, "skipping trait object field");
                continue;
            }
            if field.embedded {
                self.walk(&(field.shape)(), path, depth, &claimed, found)?;
                continue;
            }
            // Embedded fields are handled first: a private flattened field
            // still contributes its public fields.
            if !field.exported {
                continue;
            }
            self.walk(&(field.shape)(), &path.child(field.name), depth, &[], found)?;
        }
        Ok(())
    }

    fn walk_indexed(
        &self,
        kind: Indexed,
        element: ShapeFn,
        path: &Path,
        depth: usize,
        reserved: &[String],
        found: &mut Vec<DiscoveredValue>,
    ) -> Result<(), EnvError> {
        let prefix = self.naming.var_name(path);
        let separator = self.naming.separator();
        let listing = if prefix.is_empty() {
            String::new()
        } else {
            format!("{prefix}{separator}")
        };
        let names: Vec<String> = self
            .env
            .names_with_prefix(&listing)
            .into_iter()
            .filter(|name| {
                let owned = owned_by_sibling(name, reserved, separator);
                if owned {
                    trace!(variable = %name, "leaving variable to a sibling field");
                }
                !owned
            })
            .collect();
        let element_shape = element();
        for variable in next_level_vars(&prefix, separator, &names) {
            let key = key_from_var(&variable, &prefix, separator);
            trace!(%variable, %key, "indexed key");
            match kind {
                Indexed::Array(len) => {
                    let index = parse_index(&key, &variable)?;
                    if index >= len {
                        return Err(EnvError::index_out_of_bounds(index, len, variable));
                    }
                }
                Indexed::Sequence => {
                    parse_index(&key, &variable)?;
                }
                Indexed::Mapping => {}
            }
            self.walk(&element_shape, &path.child(key), depth, &[], found)?;
        }
        Ok(())
    }

    fn load_leaf(&self, path: &Path, found: &mut Vec<DiscoveredValue>) {
        let variable = self.naming.var_name(path);
        if let Some(raw) = self.env.lookup(&variable) {
            debug!(%variable, %path, "found environment value");
            found.push(DiscoveredValue::new(raw, path.clone()));
        }
    }
}

/// Whether `name` is, or lies below, one of the `reserved` variable names.
fn owned_by_sibling(name: &str, reserved: &[String], separator: &str) -> bool {
    reserved.iter().any(|owner| {
        name.strip_prefix(owner.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(separator))
    })
}

fn parse_index(key: &str, variable: &str) -> Result<usize, EnvError> {
    key.parse::<usize>()
        .map_err(|source| EnvError::invalid_index(key, variable, source))
}

#[cfg(test)]
mod tests {
    //! Unit tests for shape walking against in-memory environments.

    use anyhow::{Result, ensure};
    use rstest::rstest;

    use super::{DiscoveredValue, Discoverer, MAX_DEPTH};
    use crate::shape::{FieldShape, RecordShape, Shape};
    use crate::{EnvError, EnvNaming, MapEnv, Path, Reflect};

    fn basic() -> Shape {
        Shape::Record(RecordShape::new(
            "Basic",
            vec![
                FieldShape::new("StringValue", String::shape),
                FieldShape::new("IntValue", i64::shape),
            ],
        ))
    }

    fn run(shape: &Shape, env: &MapEnv) -> Result<Vec<DiscoveredValue>, EnvError> {
        let naming = EnvNaming::default();
        Discoverer::new(&naming, env).discover(shape, &Path::root())
    }

    #[rstest]
    fn reads_present_leaves_only() -> Result<()> {
        let env = MapEnv::new().with("STRING_VALUE", "FOOO");
        let found = run(&basic(), &env)?;
        ensure!(
            found == [DiscoveredValue::new("FOOO", Path::from_segments(["StringValue"]))],
            "unexpected values {found:?}"
        );
        Ok(())
    }

    #[rstest]
    fn private_and_abstract_fields_are_ignored() -> Result<()> {
        let shape = Shape::Record(RecordShape::new(
            "Mixed",
            vec![
                FieldShape::new("hidden", String::shape).private(),
                FieldShape::new("delegate", || {
                    Shape::unsupported::<str>(crate::UnsupportedKind::AbstractCapability)
                })
                .abstract_capability(),
                FieldShape::new("IntValue", i64::shape),
            ],
        ));
        let env = MapEnv::new()
            .with("HIDDEN", "x")
            .with("DELEGATE", "y")
            .with("INT_VALUE", "10");
        let found = run(&shape, &env)?;
        ensure!(found.len() == 1, "expected one value, got {found:?}");
        Ok(())
    }

    #[rstest]
    fn listing_requires_the_separator() -> Result<()> {
        let shape = Shape::Record(RecordShape::new(
            "Root",
            vec![FieldShape::new("Config", <Vec<i32>>::shape)],
        ));
        let env = MapEnv::new().with("CONFIGURATION", "1").with("CONFIG_0", "2");
        let found = run(&shape, &env)?;
        ensure!(
            found == [DiscoveredValue::new("2", Path::from_segments(["Config", "0"]))],
            "unexpected values {found:?}"
        );
        Ok(())
    }

    #[rstest]
    fn flattened_containers_skip_sibling_variables() -> Result<()> {
        let shape = Shape::Record(RecordShape::new(
            "Root",
            vec![FieldShape::new("basic", || {
                Shape::Record(RecordShape::new(
                    "Basic",
                    vec![
                        FieldShape::new("users", <Vec<String>>::shape).embedded(),
                        FieldShape::new("users_file", String::shape),
                    ],
                ))
            })],
        ));
        let env = MapEnv::new()
            .with("BASIC_0", "alice")
            .with("BASIC_USERS_FILE", "users.txt");
        let found = run(&shape, &env)?;
        let expected = [
            DiscoveredValue::new("alice", Path::from_segments(["basic", "0"])),
            DiscoveredValue::new("users.txt", Path::from_segments(["basic", "users_file"])),
        ];
        ensure!(found == expected, "unexpected values {found:?}");
        Ok(())
    }

    #[rstest]
    fn self_referential_shapes_hit_the_limit() {
        fn node() -> Shape {
            Shape::Record(RecordShape::new(
                "Node",
                vec![FieldShape::new("next", || Shape::Indirection(node))],
            ))
        }
        let outcome = run(&node(), &MapEnv::new());
        assert!(matches!(outcome, Err(EnvError::RecursionLimit { .. })));
        assert!(MAX_DEPTH > 8);
    }
}
