//! Types dealing with predicates on sampled values

#![deny(unsafe_code)]

use std::error::Error as StdError;

use crate::error::EvaluationError;
use crate::supplier::Fallible;

/// A predicate on sampled values
pub trait Predicate<T>
where
    T: ?Sized,
{
    /// Evaluates the predicate on the given value
    ///
    /// # Errors
    /// Returns an error if the predicate cannot be evaluated, which aborts polling
    fn test(&mut self, value: &T) -> Result<bool, EvaluationError>;
}

/// Every `FnMut(&T) -> bool` closure is a predicate that never fails
impl<F, T> Predicate<T> for F
where
    F: FnMut(&T) -> bool,
    T: ?Sized,
{
    fn test(&mut self, value: &T) -> Result<bool, EvaluationError> {
        Ok(self(value))
    }
}

impl<F, T, E> Predicate<T> for Fallible<F>
where
    F: FnMut(&T) -> Result<bool, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
    T: ?Sized,
{
    fn test(&mut self, value: &T) -> Result<bool, EvaluationError> {
        (self.0)(value).map_err(EvaluationError::new)
    }
}

/// A predicate that is satisfied by values equal to an expected value
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EqualTo<U>(U);

/// Creates a predicate that is satisfied by values equal to `expected`
///
/// This works for both typed values and [`FieldValue`](crate::FieldValue)s.
pub fn equal_to<U>(expected: U) -> EqualTo<U> {
    EqualTo(expected)
}

impl<T, U> Predicate<T> for EqualTo<U>
where
    T: PartialEq<U> + ?Sized,
{
    fn test(&mut self, value: &T) -> Result<bool, EvaluationError> {
        Ok(*value == self.0)
    }
}
