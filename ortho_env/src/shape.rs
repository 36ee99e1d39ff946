//! Type shapes and mutable views used by discovery and assignment.
//!
//! [`Shape`] is the static description of a configuration type: which parts
//! are scalars, indirections, records or indexed containers. Discovery walks
//! it to decide which variable names to look up. [`ReflectMut`] is the
//! matching view over a live value, used by assignment to write the
//! discovered strings back into place.
//!
//! Records implement [`Reflect`] through `#[derive(Reflect)]`; the crate
//! provides implementations for primitives, `Option`, `Box`, arrays, `Vec`,
//! `HashMap` and `BTreeMap`, and the unsupported kinds.

use std::any::Any;
use std::fmt;

use crate::discover::MAX_DEPTH;
use crate::{EnvError, ParserRegistry};

/// Lazily evaluated shape of a nested type.
pub type ShapeFn = fn() -> Shape;

/// Why a type cannot take part in discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedKind {
    /// A type with no usable value, such as `()`.
    Invalid,
    /// A channel endpoint.
    Channel,
    /// A function pointer.
    Function,
    /// A trait object reached where a concrete type was required.
    AbstractCapability,
    /// A raw pointer.
    RawReference,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Invalid => "no value",
            Self::Channel => "channel",
            Self::Function => "function",
            Self::AbstractCapability => "trait object",
            Self::RawReference => "raw pointer",
        };
        f.write_str(label)
    }
}

/// Static description of a configuration type.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A leaf converted from a string by the parser registry.
    Scalar {
        /// Rust type name, used in diagnostics.
        type_name: &'static str,
    },
    /// `Option<T>` or `Box<T>`; invisible in variable names.
    Indirection(ShapeFn),
    /// A struct with named fields.
    Record(RecordShape),
    /// `[T; N]`.
    FixedArray {
        /// Declared length.
        len: usize,
        /// Element shape.
        element: ShapeFn,
    },
    /// `Vec<T>`.
    Sequence {
        /// Element shape.
        element: ShapeFn,
    },
    /// `HashMap<K, V>` or `BTreeMap<K, V>`.
    Mapping {
        /// Rust type name of the key.
        key_type: &'static str,
        /// Value shape.
        value: ShapeFn,
    },
    /// A type discovery cannot process.
    Unsupported {
        /// Rust type name, used in diagnostics.
        type_name: &'static str,
        /// The offending kind.
        kind: UnsupportedKind,
    },
}

impl Shape {
    /// Scalar shape for `T`.
    #[must_use]
    pub fn scalar<T: ?Sized>() -> Self {
        Self::Scalar {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Unsupported shape for `T`.
    #[must_use]
    pub fn unsupported<T: ?Sized>(kind: UnsupportedKind) -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>(),
            kind,
        }
    }

    /// Whether a record reachable from this shape declares a field `name`.
    ///
    /// Flattened fields are searched recursively and indirections are
    /// followed; every other shape declares nothing.
    #[must_use]
    pub fn declares_field(&self, name: &str) -> bool {
        match self {
            Self::Record(record) => record.declares_field(name),
            Self::Indirection(target) => target().declares_field(name),
            _ => false,
        }
    }

    /// Whether this shape, once flattened, can take values whose leading
    /// segment names no field.
    ///
    /// That holds for arrays, sequences and maps, and for records and
    /// indirections that reach one through further flattened fields.
    #[must_use]
    pub fn takes_stray_segments(&self) -> bool {
        self.takes_stray_segments_within(0)
    }

    fn takes_stray_segments_within(&self, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        let next = depth.saturating_add(1);
        match self {
            Self::FixedArray { .. } | Self::Sequence { .. } | Self::Mapping { .. } => true,
            Self::Indirection(target) => target().takes_stray_segments_within(next),
            Self::Record(record) => record
                .fields
                .iter()
                .any(|field| field.embedded && (field.shape)().takes_stray_segments_within(next)),
            Self::Scalar { .. } | Self::Unsupported { .. } => false,
        }
    }
}

/// Fields of a record, in declaration order.
#[derive(Debug, Clone)]
pub struct RecordShape {
    /// Rust type name of the record.
    pub type_name: &'static str,
    /// Declared fields, skipped ones excluded.
    pub fields: Vec<FieldShape>,
}

impl RecordShape {
    /// Describes a record type.
    #[must_use]
    pub const fn new(type_name: &'static str, fields: Vec<FieldShape>) -> Self {
        Self { type_name, fields }
    }

    fn declares_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| {
            if field.embedded {
                (field.shape)().declares_field(name)
            } else {
                field.name == name
            }
        })
    }
}

/// One declared field of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldShape {
    /// Segment name used in paths and for lookup during assignment.
    pub name: &'static str,
    /// `true` for `pub` fields.
    pub exported: bool,
    /// `true` for flattened fields, whose own fields join the parent's path.
    pub embedded: bool,
    /// `true` when the field's type is a trait object.
    pub abstract_capability: bool,
    /// Shape of the field's type.
    pub shape: ShapeFn,
}

impl FieldShape {
    /// An exported, non-embedded field.
    #[must_use]
    pub const fn new(name: &'static str, shape: ShapeFn) -> Self {
        Self {
            name,
            exported: true,
            embedded: false,
            abstract_capability: false,
            shape,
        }
    }

    /// Marks the field as not exported.
    #[must_use]
    pub const fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Marks the field as flattened into its parent.
    #[must_use]
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Marks the field as holding a trait object.
    #[must_use]
    pub const fn abstract_capability(mut self) -> Self {
        self.abstract_capability = true;
        self
    }
}

/// Types whose shape can be described and whose values can be written.
///
/// Implement it with `#[derive(Reflect)]` for records and enums.
pub trait Reflect: Any + DynShape {
    /// The static shape of `Self`.
    fn shape() -> Shape
    where
        Self: Sized;

    /// A mutable view over this value.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

/// Object-safe access to [`Reflect::shape`].
pub trait DynShape {
    /// The shape of the concrete type behind this value.
    fn dyn_shape(&self) -> Shape;
}

impl<T: Reflect> DynShape for T {
    fn dyn_shape(&self) -> Shape {
        T::shape()
    }
}

/// Mutable view over a live value, mirroring [`Shape`].
#[non_exhaustive]
pub enum ReflectMut<'a> {
    /// A leaf value.
    Scalar(&'a mut dyn ScalarMut),
    /// An optional or boxed value.
    Indirection(&'a mut dyn IndirectionMut),
    /// A struct with named fields.
    Record(&'a mut dyn RecordMut),
    /// A fixed-size array.
    FixedArray(&'a mut dyn ListMut),
    /// A growable sequence.
    Sequence(&'a mut dyn ListMut),
    /// A key/value map.
    Mapping(&'a mut dyn MapMut),
    /// A value that cannot be written.
    Unsupported {
        /// Rust type name.
        type_name: &'static str,
        /// The offending kind.
        kind: UnsupportedKind,
    },
}

/// A leaf value assigned from a string.
pub trait ScalarMut {
    /// Rust type name of the leaf.
    fn scalar_type_name(&self) -> &'static str;

    /// Parses `raw` with the registry and stores the result.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingParser`] when no parser is registered for
    /// the leaf type, or [`EnvError::Parse`] when conversion fails.
    fn set_from_str(&mut self, raw: &str, parsers: &ParserRegistry) -> Result<(), EnvError>;
}

impl<T: Any> ScalarMut for T {
    fn scalar_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn set_from_str(&mut self, raw: &str, parsers: &ParserRegistry) -> Result<(), EnvError> {
        *self = parsers.parse::<T>(raw)?;
        Ok(())
    }
}

/// An optional or boxed value.
pub trait IndirectionMut {
    /// Whether the target is currently absent.
    fn is_unset(&self) -> bool;

    /// Returns the target, creating a default one when absent.
    fn materialize(&mut self) -> &mut dyn Reflect;

    /// Shape of the target type.
    fn target_shape(&self) -> Shape;
}

/// A struct with named fields.
pub trait RecordMut {
    /// Looks up a field by segment name, searching flattened records after
    /// the record's own fields.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Every flattened field, in declaration order.
    fn flattened_mut(&mut self) -> Vec<&mut dyn Reflect>;
}

/// A fixed-size array or a growable sequence.
pub trait ListMut {
    /// Current number of elements.
    fn len(&self) -> usize;

    /// Whether the list holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`. Sequences grow with default elements to
    /// make room; arrays return `None` past their length.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::SequenceTooLarge`] when a sequence cannot grow to
    /// hold `index`.
    fn slot_mut(&mut self, index: usize) -> Result<Option<&mut dyn Reflect>, EnvError>;
}

/// Callback filling a freshly created map value.
pub type EntryFill<'f> = dyn FnMut(&mut dyn Reflect) -> Result<(), EnvError> + 'f;

/// A key/value map.
pub trait MapMut {
    /// Rust type name of the key.
    fn key_type_name(&self) -> &'static str;

    /// Parses `raw_key`, fills a default value with `fill` and inserts it,
    /// replacing any previous entry for the key.
    ///
    /// # Errors
    ///
    /// Propagates key conversion failures and any error returned by `fill`.
    fn replace_entry(
        &mut self,
        raw_key: &str,
        parsers: &ParserRegistry,
        fill: &mut EntryFill<'_>,
    ) -> Result<(), EnvError>;
}

/// Field lookup through a flattened field.
///
/// Used by derived [`RecordMut::field_mut`] implementations. Records are
/// searched directly. Indirections are materialised only when their target
/// declares `name`, so a miss never allocates.
#[doc(hidden)]
pub fn embedded_field_mut<'a>(target: &'a mut dyn Reflect, name: &str) -> Option<&'a mut dyn Reflect> {
    match target.reflect_mut() {
        ReflectMut::Record(record) => record.field_mut(name),
        ReflectMut::Indirection(indirection) => {
            if indirection.target_shape().declares_field(name) {
                embedded_field_mut(indirection.materialize(), name)
            } else {
                None
            }
        }
        _ => None,
    }
}
