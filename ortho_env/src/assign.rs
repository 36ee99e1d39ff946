//! Writing discovered values into a live configuration record.
//!
//! Assignment mirrors discovery: every value's path is consumed one segment
//! at a time while descending through records, indirections and indexed
//! containers. Values whose path no longer matches the record are dropped
//! without error, so a stale discovery result can never fail a load.

use std::collections::HashSet;

use tracing::trace;

use crate::discover::DiscoveredValue;
use crate::shape::{DynShape, EntryFill, ListMut, MapMut, RecordMut, Reflect, ReflectMut};
use crate::{EnvError, ParserRegistry, Path};

/// Keeps the values under `prefix`, with the prefix removed from their paths.
///
/// Matching is segment-wise. An empty prefix keeps every value unchanged.
///
/// # Examples
///
/// ```
/// use ortho_env::{DiscoveredValue, Path, assign::filter_with_prefix};
///
/// let values = [
///     DiscoveredValue::new("FOOO", Path::from_segments(["Config", "0", "StringValue"])),
///     DiscoveredValue::new("10", Path::from_segments(["Config", "IntValue"])),
/// ];
/// let scoped = filter_with_prefix(&values, &Path::from_segments(["Config", "0"]));
/// assert_eq!(scoped, [DiscoveredValue::new("FOOO", Path::from_segments(["StringValue"]))]);
/// ```
#[must_use]
pub fn filter_with_prefix(values: &[DiscoveredValue], prefix: &Path) -> Vec<DiscoveredValue> {
    values
        .iter()
        .filter_map(|value| {
            value
                .path
                .strip_prefix(prefix)
                .map(|rest| DiscoveredValue::new(value.raw.clone(), rest))
        })
        .collect()
}

/// Distinct leading segments, in first-seen order.
fn leading_segments(values: &[DiscoveredValue]) -> Vec<&str> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter_map(|value| value.path.first())
        .filter(|segment| seen.insert(*segment))
        .collect()
}

fn scoped_to(values: &[DiscoveredValue], segment: &str) -> Vec<DiscoveredValue> {
    filter_with_prefix(values, &Path::from_segments([segment]))
}

/// Writes discovered values into a record, parsing leaves with a registry.
#[derive(Debug, Clone, Copy)]
pub struct Assigner<'p> {
    parsers: &'p ParserRegistry,
}

impl<'p> Assigner<'p> {
    /// Creates an assigner converting leaves with `parsers`.
    #[must_use]
    pub const fn new(parsers: &'p ParserRegistry) -> Self {
        Self { parsers }
    }

    /// Assigns the values found under `prefix` to `dest`.
    ///
    /// Fields already written stay written when a later value fails.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingParser`] or [`EnvError::Parse`] when a leaf
    /// or map key cannot be converted, [`EnvError::SequenceTooLarge`] when a
    /// sequence index cannot be allocated, and [`EnvError::UnsupportedKind`]
    /// when a value targets a type that cannot be written.
    pub fn assign(
        &self,
        dest: &mut dyn Reflect,
        values: &[DiscoveredValue],
        prefix: &Path,
    ) -> Result<(), EnvError> {
        let scoped = filter_with_prefix(values, prefix);
        self.assign_value(dest, &scoped)
    }

    fn assign_value(&self, dest: &mut dyn Reflect, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        if values.is_empty() {
            return Ok(());
        }
        self.assign_view(dest.reflect_mut(), values)
    }

    fn assign_view(&self, view: ReflectMut<'_>, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        match view {
            ReflectMut::Scalar(slot) => {
                for value in values {
                    if value.path.is_empty() {
                        slot.set_from_str(&value.raw, self.parsers)?;
                    } else {
                        trace!(path = %value.path, leaf = slot.scalar_type_name(), "dropping value below a leaf");
                    }
                }
                Ok(())
            }
            ReflectMut::Indirection(indirection) => self.assign_value(indirection.materialize(), values),
            ReflectMut::Record(record) => self.assign_record(record, values),
            ReflectMut::FixedArray(list) | ReflectMut::Sequence(list) => self.assign_list(list, values),
            ReflectMut::Mapping(map) => self.assign_map(map, values),
            ReflectMut::Unsupported { type_name, kind } => Err(EnvError::unsupported(type_name, kind)),
        }
    }

    fn assign_record(&self, record: &mut dyn RecordMut, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        let mut unresolved = Vec::new();
        for segment in leading_segments(values) {
            match record.field_mut(segment) {
                Some(field) => self.assign_value(field, &scoped_to(values, segment))?,
                None => unresolved.push(segment),
            }
        }
        if unresolved.is_empty() {
            return Ok(());
        }
        // Flattened containers own the segments no named field claimed,
        // including containers flattened into a flattened record.
        let stray: Vec<DiscoveredValue> = values
            .iter()
            .filter(|value| value.path.first().is_some_and(|segment| unresolved.contains(&segment)))
            .cloned()
            .collect();
        let mut claimed = false;
        for field in record.flattened_mut() {
            if DynShape::dyn_shape(&*field).takes_stray_segments() {
                claimed = true;
                self.assign_value(field, &stray)?;
            }
        }
        if !claimed {
            for segment in unresolved {
                trace!(segment, "dropping value for unknown field");
            }
        }
        Ok(())
    }

    fn assign_list(&self, list: &mut dyn ListMut, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        for segment in leading_segments(values) {
            let Ok(index) = segment.parse::<usize>() else {
                trace!(segment, "dropping value with a non-numeric index");
                continue;
            };
            match list.slot_mut(index)? {
                Some(slot) => self.assign_value(slot, &scoped_to(values, segment))?,
                None => trace!(index, "dropping value past the array end"),
            }
        }
        Ok(())
    }

    fn assign_map(&self, map: &mut dyn MapMut, values: &[DiscoveredValue]) -> Result<(), EnvError> {
        for segment in leading_segments(values) {
            let scoped = scoped_to(values, segment);
            let fill: &mut EntryFill<'_> = &mut |value: &mut dyn Reflect| self.assign_value(value, &scoped);
            map.replace_entry(segment, self.parsers, fill)?;
        }
        Ok(())
    }
}
