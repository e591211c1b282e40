//! Type-erased attribute values

#![deny(unsafe_code)]

use std::any::Any;
use std::fmt::{self, Debug, Formatter};

use crate::type_ref::TypeRef;

/// Trait for types whose values can be read from attributes
///
/// This is implemented for every `T: Debug + Send + Sync + 'static`, so it never needs to be implemented manually.
pub trait AttributeType: Any + Debug + Send + Sync {
    /// Returns a reference to the value as [`Any`]
    fn as_any(&self) -> &dyn Any;

    /// Converts the boxed value into a boxed [`Any`]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Returns a reference to the type of the value
    fn type_ref(&self) -> TypeRef;
}

impl<T> AttributeType for T
where
    T: Any + Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<T>()
    }
}

/// A value read from an attribute whose type has not been fixed statically
///
/// This is what a [`FieldSupplier`](crate::FieldSupplier) produces when the query did not use
/// [`of_type`](crate::FieldQuery::of_type). It can be compared to a value of any type implementing [`PartialEq`]; the
/// comparison is `false` whenever the types differ.
///
/// # Example
/// ```
/// use fieldpoll::FieldValue;
///
/// let value = FieldValue::new(1_i32);
///
/// assert!(value == 1_i32);
/// assert!(value != 1_i8);
/// assert_eq!(value.downcast_ref::<i32>(), Some(&1));
/// ```
pub struct FieldValue(Box<dyn AttributeType>);

impl FieldValue {
    /// Wraps the given value
    pub fn new<T>(value: T) -> Self
    where
        T: AttributeType,
    {
        Self(Box::new(value))
    }

    // `Box<dyn AttributeType>` is an `AttributeType` itself, so calls must go through the trait object
    fn inner(&self) -> &dyn AttributeType {
        &*self.0
    }

    /// Returns a reference to the type of the contained value
    pub fn type_ref(&self) -> TypeRef {
        self.inner().type_ref()
    }

    /// Returns whether the contained value is of type `T`
    pub fn is<T>(&self) -> bool
    where
        T: Any,
    {
        self.inner().as_any().is::<T>()
    }

    /// Returns a reference to the contained value if it is of type `T`
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.inner().as_any().downcast_ref()
    }

    /// Converts into the contained value if it is of type `T`, returning `self` otherwise
    pub fn downcast<T>(self) -> Result<T, Self>
    where
        T: Any,
    {
        // a failed `Box<dyn Any>` downcast cannot give back `self`, so the type is checked first
        if self.is::<T>() {
            match self.0.into_any().downcast::<T>() {
                Ok(value) => Ok(*value),
                // invariant: the concrete type of a value never changes, and it was just checked to be `T`
                Err(_) => unreachable!("type of attribute value changed during downcast"),
            }
        } else {
            Err(self)
        }
    }
}

impl Debug for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.inner(), f)
    }
}

impl<T> PartialEq<T> for FieldValue
where
    T: Any + PartialEq,
{
    fn eq(&self, other: &T) -> bool {
        self.downcast_ref::<T>().is_some_and(|value| value == other)
    }
}
