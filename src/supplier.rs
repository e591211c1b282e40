//! Sources of values to be polled

#![deny(unsafe_code)]

use std::error::Error as StdError;

use crate::attribute::Inspect;
use crate::error::{AttributeNotFoundError, EvaluationError};
use crate::resolve::{FieldQuery, FieldSupplier, ValueKind};

/// A source of values that is sampled repeatedly
///
/// Every `FnMut() -> T` closure is a supplier that never fails. Wrap a closure returning a [`Result`] in
/// [`fallible`] to make its errors abort polling.
pub trait Supplier {
    /// The type of the sampled values
    type Output;

    /// Samples the current value
    ///
    /// # Errors
    /// Returns an error if the value cannot be sampled
    fn get(&mut self) -> Result<Self::Output, EvaluationError>;
}

impl<F, T> Supplier for F
where
    F: FnMut() -> T,
{
    type Output = T;

    fn get(&mut self) -> Result<T, EvaluationError> {
        Ok(self())
    }
}

impl<O, K> Supplier for FieldSupplier<'_, O, K>
where
    K: ValueKind,
{
    type Output = K::Output;

    fn get(&mut self) -> Result<K::Output, EvaluationError> {
        FieldSupplier::get(self)
    }
}

/// Wrapper for closures whose errors are fatal to polling
///
/// A `Fallible<F>` is a [`Supplier`] if `F: FnMut() -> Result<T, E>` and a [`Predicate`](crate::Predicate) if
/// `F: FnMut(&T) -> Result<bool, E>`.
#[derive(Clone, Copy, Debug)]
pub struct Fallible<F>(pub(crate) F);

/// Wraps a closure returning a [`Result`] so that its errors abort polling
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use fieldpoll::fallible;
///
/// let result = fieldpoll::wait()
///     .at_most(Duration::from_secs(1))
///     .until(fallible(|| "not a number".parse::<i32>()), |value| *value == 1);
///
/// assert!(result.unwrap_err().is_evaluation());
/// ```
pub fn fallible<F>(f: F) -> Fallible<F> {
    Fallible(f)
}

impl<F, T, E> Supplier for Fallible<F>
where
    F: FnMut() -> Result<T, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    type Output = T;

    fn get(&mut self) -> Result<T, EvaluationError> {
        (self.0)().map_err(EvaluationError::new)
    }
}

/// Conversion into a [`Supplier`]
///
/// Every supplier converts into itself. A [`FieldQuery`] converts by resolving its attribute, which is the only way
/// this conversion can fail.
pub trait IntoSupplier {
    /// The resulting supplier
    type Supplier: Supplier;

    /// Converts into a supplier
    ///
    /// # Errors
    /// Returns an error if an attribute cannot be resolved
    fn into_supplier(self) -> Result<Self::Supplier, AttributeNotFoundError>;
}

impl<S> IntoSupplier for S
where
    S: Supplier,
{
    type Supplier = S;

    fn into_supplier(self) -> Result<S, AttributeNotFoundError> {
        Ok(self)
    }
}

impl<'a, O, K> IntoSupplier for FieldQuery<'a, O, K>
where
    O: Inspect,
    K: ValueKind,
{
    type Supplier = FieldSupplier<'a, O, K>;

    fn into_supplier(self) -> Result<FieldSupplier<'a, O, K>, AttributeNotFoundError> {
        self.resolve()
    }
}

/// The type of values sampled from a source
pub type SourceOutput<S> = <<S as IntoSupplier>::Supplier as Supplier>::Output;

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn closure_is_sampled_on_every_get() {
        let counter = Cell::new(0);
        let mut supplier = || {
            counter.set(counter.get() + 1);
            counter.get()
        };

        assert_eq!(Supplier::get(&mut supplier).unwrap(), 1);
        assert_eq!(Supplier::get(&mut supplier).unwrap(), 2);
    }

    #[test]
    fn fallible_closure_error_becomes_evaluation_error() {
        let mut supplier = fallible(|| Err::<i32, _>("gone"));

        let err = supplier.get().unwrap_err();

        assert_eq!(err.to_string(), "failed to evaluate condition: gone");
    }
}
