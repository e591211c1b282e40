//! Dealing with the identity of declared types and markers

#![deny(unsafe_code)]

use std::any::{self, TypeId};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// A reference to a Rust type, used as the declared type of an attribute
///
/// Two type references are equal if and only if they refer to the same type as determined by [`TypeId`]. There is
/// no widening or coercion: a [`TypeRef`] of [`i8`] is not equal to a [`TypeRef`] of [`i32`].
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    /// Creates a [`TypeRef`] referring to the type `T`
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Returns the name of the referenced type
    ///
    /// This is meant for diagnostics only, see [`std::any::type_name`].
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether this refers to the type `T`
    pub fn is<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.id.hash(state);
    }
}

impl Debug for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A marker that can be attached to an attribute declaration
///
/// Markers are usually zero-sized types that carry no data. Whether an attribute carries a marker can be used as a
/// selection criterion when resolving attributes, see
/// [`FieldQuery::annotated_with`](crate::FieldQuery::annotated_with).
///
/// # Example
/// ```
/// use fieldpoll::Marker;
///
/// struct Observed;
///
/// impl Marker for Observed {}
/// ```
pub trait Marker: 'static {}

/// A reference to a [`Marker`] type
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct MarkerRef(TypeRef);

impl MarkerRef {
    /// Creates a [`MarkerRef`] referring to the marker `M`
    pub fn of<M>() -> Self
    where
        M: Marker + ?Sized,
    {
        Self(TypeRef::of::<M>())
    }

    /// Returns the name of the referenced marker type
    pub const fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Debug for MarkerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MarkerRef").field(&self.0.name()).finish()
    }
}

impl Display for MarkerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.0)
    }
}
