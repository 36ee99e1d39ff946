//! [`Reflect`] implementations for standard library types.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::shape::{
    EntryFill, IndirectionMut, ListMut, MapMut, Reflect, ReflectMut, Shape, UnsupportedKind,
};
use crate::{EnvError, ParserRegistry};

/// Implements [`Reflect`] for types assigned through the parser registry.
///
/// Use it for your own leaf types, then register a parser for them.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Port(u16);
///
/// impl FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.parse().map(Port)
///     }
/// }
///
/// ortho_env::scalar!(Port);
///
/// let mut parsers = ortho_env::ParserRegistry::with_defaults();
/// parsers.register_from_str::<Port>();
/// assert_eq!(parsers.parse::<Port>("80").ok(), Some(Port(80)));
/// ```
#[macro_export]
macro_rules! scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflect for $ty {
                fn shape() -> $crate::Shape {
                    $crate::Shape::scalar::<Self>()
                }

                fn reflect_mut(&mut self) -> $crate::ReflectMut<'_> {
                    $crate::ReflectMut::Scalar(self)
                }
            }
        )+
    };
}

scalar!(
    bool, char, String, PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, i8, i16, i32, i64, i128,
    isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: Reflect + Default> Reflect for Option<T> {
    fn shape() -> Shape {
        Shape::Indirection(T::shape)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Indirection(self)
    }
}

impl<T: Reflect + Default> IndirectionMut for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn materialize(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }

    fn target_shape(&self) -> Shape {
        T::shape()
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn shape() -> Shape {
        Shape::Indirection(T::shape)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Indirection(self)
    }
}

impl<T: Reflect> IndirectionMut for Box<T> {
    fn is_unset(&self) -> bool {
        false
    }

    fn materialize(&mut self) -> &mut dyn Reflect {
        &mut **self
    }

    fn target_shape(&self) -> Shape {
        T::shape()
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn shape() -> Shape {
        Shape::FixedArray {
            len: N,
            element: T::shape,
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::FixedArray(self)
    }
}

impl<T: Reflect, const N: usize> ListMut for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn slot_mut(&mut self, index: usize) -> Result<Option<&mut dyn Reflect>, EnvError> {
        Ok(self.get_mut(index).map(|slot| slot as &mut dyn Reflect))
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence { element: T::shape }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Sequence(self)
    }
}

impl<T: Reflect + Default> ListMut for Vec<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn slot_mut(&mut self, index: usize) -> Result<Option<&mut dyn Reflect>, EnvError> {
        let current = Self::len(self);
        if index >= current {
            let element = std::any::type_name::<T>();
            let grown = index
                .checked_add(1)
                .ok_or_else(|| EnvError::sequence_too_large(index, element, None))?;
            self.try_reserve_exact(grown - current)
                .map_err(|err| EnvError::sequence_too_large(index, element, Some(err)))?;
            self.resize_with(grown, T::default);
        }
        Ok(self.get_mut(index).map(|slot| slot as &mut dyn Reflect))
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Eq + Hash + 'static,
    V: Reflect + Default,
    S: BuildHasher + Default + 'static,
{
    fn shape() -> Shape {
        Shape::Mapping {
            key_type: std::any::type_name::<K>(),
            value: V::shape,
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Mapping(self)
    }
}

impl<K, V, S> MapMut for HashMap<K, V, S>
where
    K: Eq + Hash + 'static,
    V: Reflect + Default,
    S: BuildHasher + Default + 'static,
{
    fn key_type_name(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn replace_entry(
        &mut self,
        raw_key: &str,
        parsers: &ParserRegistry,
        fill: &mut EntryFill<'_>,
    ) -> Result<(), EnvError> {
        let key = parsers.parse::<K>(raw_key)?;
        let mut value = V::default();
        fill(&mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Ord + 'static,
    V: Reflect + Default,
{
    fn shape() -> Shape {
        Shape::Mapping {
            key_type: std::any::type_name::<K>(),
            value: V::shape,
        }
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Mapping(self)
    }
}

impl<K, V> MapMut for BTreeMap<K, V>
where
    K: Ord + 'static,
    V: Reflect + Default,
{
    fn key_type_name(&self) -> &'static str {
        std::any::type_name::<K>()
    }

    fn replace_entry(
        &mut self,
        raw_key: &str,
        parsers: &ParserRegistry,
        fill: &mut EntryFill<'_>,
    ) -> Result<(), EnvError> {
        let key = parsers.parse::<K>(raw_key)?;
        let mut value = V::default();
        fill(&mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

/// Implements [`Reflect`] for types that discovery must reject.
macro_rules! unsupported {
    ($kind:expr => $([$($generics:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> Reflect for $ty {
                fn shape() -> Shape {
                    Shape::unsupported::<Self>($kind)
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Unsupported {
                        type_name: std::any::type_name::<Self>(),
                        kind: $kind,
                    }
                }
            }
        )+
    };
}

unsupported!(UnsupportedKind::Invalid => [] ());
unsupported!(
    UnsupportedKind::Channel =>
    [T: 'static] Sender<T>,
    [T: 'static] SyncSender<T>,
    [T: 'static] Receiver<T>,
);
unsupported!(
    UnsupportedKind::RawReference =>
    [T: ?Sized + 'static] *const T,
    [T: ?Sized + 'static] *mut T,
);
unsupported!(
    UnsupportedKind::Function =>
    [R: 'static] fn() -> R,
    [A: 'static, R: 'static] fn(A) -> R,
    [A: 'static, B: 'static, R: 'static] fn(A, B) -> R,
    [A: 'static, B: 'static, C: 'static, R: 'static] fn(A, B, C) -> R,
);
