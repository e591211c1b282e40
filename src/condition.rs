#![deny(unsafe_code)]

use std::fmt::{self, Debug, Formatter};

use crate::error::EvaluationError;
use crate::predicate::Predicate;
use crate::supplier::Supplier;

/// The outcome of evaluating a [`Condition`] once
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Evaluation<T> {
    satisfied: bool,
    value: T,
}

impl<T> Evaluation<T> {
    /// Returns whether the predicate was satisfied by the sampled value
    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// Returns the sampled value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Converts into the sampled value
    pub fn into_value(self) -> T {
        self.value
    }

    pub(crate) fn into_parts(self) -> (bool, T) {
        (self.satisfied, self.value)
    }
}

/// A supplier paired with a predicate on its values
pub struct Condition<S, P> {
    supplier: S,
    predicate: P,
}

impl<S, P> Condition<S, P>
where
    S: Supplier,
    P: Predicate<S::Output>,
{
    /// Creates a condition that is satisfied when `predicate` holds for the value sampled from `supplier`
    pub fn new(supplier: S, predicate: P) -> Self {
        Self { supplier, predicate }
    }

    /// Samples the supplier exactly once and tests the predicate on the sampled value
    ///
    /// Nothing is cached, every call takes a fresh sample.
    ///
    /// # Errors
    /// Returns an error if either sampling or testing fails
    pub fn evaluate(&mut self) -> Result<Evaluation<S::Output>, EvaluationError> {
        let value = self.supplier.get()?;
        let satisfied = self.predicate.test(&value)?;

        Ok(Evaluation { satisfied, value })
    }
}

impl<S, P> Debug for Condition<S, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}
