//! `Walk` and `Describe` implementations for std types

use std::any::Any;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::rc::Rc;
use std::sync::Arc;

use crate::shape::{Describe, MapShape, Scalar, SequenceShape, Shape, TypeDesc, Walk};

macro_rules! impl_scalar {
    ($variant:ident as $cast:ty => $($ty:ty),+ $(,)?) => {
        $(
            impl Walk for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::$variant(*self as $cast))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }

            impl Describe for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::Scalar
                }
            }
        )+
    };
}

macro_rules! impl_display_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Walk for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Scalar::Display(self))
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }

            impl Describe for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::Scalar
                }
            }
        )+
    };
}

impl_scalar!(Int as i64 => i8, i16, i32, i64, isize);
impl_scalar!(Uint as u64 => u8, u16, u32, u64, usize);
impl_scalar!(Float as f64 => f32, f64);
impl_display_scalar!(i128, u128);

impl Walk for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Bool(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Walk for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Char(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Walk for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Unit)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Walk for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Walk for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(self))
    }
}

impl Walk for &'static str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Scalar::Str(*self))
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

impl Describe for bool {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

impl Describe for char {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

impl Describe for () {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

impl Describe for String {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

impl Describe for str {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

impl Describe for &'static str {
    fn describe() -> TypeDesc {
        TypeDesc::Scalar
    }
}

// Pointers. `None` is a nil pointer.

impl<T: Walk + Describe> Walk for Option<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(self.as_ref().map(|v| v as &dyn Walk))
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::pointer(T::describe())
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),+ $(,)?) => {
        $(
            impl<T: Walk + Describe> Walk for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Pointer(Some(&**self))
                }
            }

            impl<T: Describe> Describe for $ptr<T> {
                fn describe() -> TypeDesc {
                    TypeDesc::pointer(T::describe())
                }
            }
        )+
    };
}

impl_pointer!(Box, Rc, Arc);

impl<T: Walk + Describe> Walk for &T {
    fn shape(&self) -> Shape<'_> {
        Shape::Pointer(Some(*self))
    }
}

impl<T: Describe> Describe for &T {
    fn describe() -> TypeDesc {
        TypeDesc::pointer(T::describe())
    }
}

// Interface values hand the traverser the value inside. Maps and sequences
// behind an interface are not walked.

impl Walk for Box<dyn Walk> {
    fn shape(&self) -> Shape<'_> {
        Shape::Interface(&**self)
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

impl Describe for Box<dyn Walk> {
    fn describe() -> TypeDesc {
        TypeDesc::Interface
    }
}

// Sequences

impl<T: Walk + Describe> Walk for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        <[T] as Walk>::shape(self)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::sequence(T::describe())
    }
}

impl<T: Walk + Describe> Walk for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(SequenceShape::new(
            T::describe(),
            self.iter().map(|v| v as &dyn Walk),
        ))
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDesc {
        TypeDesc::sequence(T::describe())
    }
}

impl<T: Walk + Describe, const N: usize> Walk for [T; N] {
    fn shape(&self) -> Shape<'_> {
        <[T] as Walk>::shape(self)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDesc {
        TypeDesc::sequence(T::describe())
    }
}

impl<T: Walk + Describe> Walk for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(SequenceShape::new(
            T::describe(),
            self.iter().map(|v| v as &dyn Walk),
        ))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDesc {
        TypeDesc::sequence(T::describe())
    }
}

// Maps. Keys are rendered with `Display`.

impl<K: Display, V: Walk + Describe, S> Walk for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(MapShape::new(
            V::describe(),
            self.iter().map(|(k, v)| (k.to_string(), v as &dyn Walk)),
        ))
    }
}

impl<K, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDesc {
        TypeDesc::map(V::describe())
    }
}

impl<K: Display, V: Walk + Describe> Walk for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(MapShape::new(
            V::describe(),
            self.iter().map(|(k, v)| (k.to_string(), v as &dyn Walk)),
        ))
    }
}

impl<K, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDesc {
        TypeDesc::map(V::describe())
    }
}
