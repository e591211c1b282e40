use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use thiserror::Error;

use crate::criteria::Criteria;

/// The reason why an attribute could not be resolved
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NotFoundReason {
    /// No criteria were given
    NoCriteria,

    /// No attribute matches the criteria
    NoMatch,

    /// Only instance attributes match the criteria, but no instance was given
    InstanceThroughType,

    /// More than one attribute matches the criteria
    Ambiguous {
        /// Number of matching attributes
        matches: usize,
    },
}

impl Display for NotFoundReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCriteria => f.write_str("no criteria were given"),
            Self::NoMatch => f.write_str("no attribute matches"),
            Self::InstanceThroughType => f.write_str("only instance attributes match, but no instance was given"),
            Self::Ambiguous { matches } => write!(f, "{matches} attributes match, criteria are ambiguous"),
        }
    }
}

/// Error resolving an attribute
///
/// This is returned when zero or more than one attribute matches the criteria. Use [`reason`](Self::reason) to tell
/// these cases apart.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("failed to resolve attribute of {owner} with {criteria}: {reason}")]
pub struct AttributeNotFoundError {
    owner: &'static str,
    criteria: Criteria,
    reason: NotFoundReason,
}

impl AttributeNotFoundError {
    pub(crate) fn new(owner: &'static str, criteria: Criteria, reason: NotFoundReason) -> Self {
        Self {
            owner,
            criteria,
            reason,
        }
    }

    /// Returns the name of the type whose attributes were searched
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Returns the criteria that were attempted
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Returns the reason why resolution failed
    pub fn reason(&self) -> NotFoundReason {
        self.reason
    }
}

/// Error returned when a condition is not satisfied before the timeout elapses
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(
    "{} was not fulfilled within {timeout:?} after {attempts} attempts{}",
    self.subject(),
    self.last_observed()
)]
pub struct ConditionTimeoutError<T>
where
    T: Debug,
{
    pub(crate) alias: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) attempts: u32,
    pub(crate) last_value: Option<T>,
}

impl<T> ConditionTimeoutError<T>
where
    T: Debug,
{
    /// Returns the alias of the condition, if any
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the timeout that elapsed
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of times the condition was evaluated
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the value observed by the final evaluation of the condition
    ///
    /// This is `None` only if the condition was never evaluated.
    pub fn last_value(&self) -> Option<&T> {
        self.last_value.as_ref()
    }

    /// Converts into the value observed by the final evaluation of the condition
    pub fn into_last_value(self) -> Option<T> {
        self.last_value
    }

    fn subject(&self) -> String {
        match &self.alias {
            Some(alias) => format!("condition with alias '{alias}'"),
            None => String::from("condition"),
        }
    }

    fn last_observed(&self) -> String {
        match &self.last_value {
            Some(value) => format!(", last observed value: {value:?}"),
            None => String::new(),
        }
    }
}

/// Error raised while sampling a value or testing a predicate
///
/// This is fatal: a polling loop aborts as soon as it encounters this error instead of treating it as "not yet
/// satisfied".
#[derive(Debug, Error)]
#[error("failed to evaluate condition: {source}")]
pub struct EvaluationError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl EvaluationError {
    /// Creates an [`EvaluationError`] from an arbitrary error or message
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self { source: source.into() }
    }

    /// Converts into the underlying error
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.source
    }
}

/// Error waiting for a condition
///
/// The type parameter `T` is the type of the sampled values.
#[derive(Debug, Error)]
pub enum AwaitError<T>
where
    T: Debug,
{
    /// The source of values could not be resolved, nothing was sampled
    #[error(transparent)]
    AttributeNotFound(#[from] AttributeNotFoundError),

    /// The condition was not satisfied within the timeout
    #[error(transparent)]
    Timeout(#[from] ConditionTimeoutError<T>),

    /// Sampling a value or testing the predicate failed
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl<T> AwaitError<T>
where
    T: Debug,
{
    /// Returns whether this is an [`AwaitError::AttributeNotFound`]
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound(_))
    }

    /// Returns whether this is an [`AwaitError::Timeout`]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns whether this is an [`AwaitError::Evaluation`]
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Self::Evaluation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_includes_alias_and_last_value() {
        let err = ConditionTimeoutError {
            alias: Some(String::from("repository updated")),
            timeout: Duration::from_millis(50),
            attempts: 3,
            last_value: Some(0),
        };

        assert_eq!(
            err.to_string(),
            "condition with alias 'repository updated' was not fulfilled within 50ms after 3 attempts, last observed \
             value: 0"
        );
    }

    #[test]
    fn timeout_display_without_alias_or_value() {
        let err = ConditionTimeoutError::<i32> {
            alias: None,
            timeout: Duration::from_secs(1),
            attempts: 0,
            last_value: None,
        };

        assert_eq!(err.to_string(), "condition was not fulfilled within 1s after 0 attempts");
    }

    #[test]
    fn not_found_display_includes_criteria() {
        let err = AttributeNotFoundError::new(
            "Repository",
            Criteria::new().with_name("value2"),
            NotFoundReason::NoMatch,
        );

        assert_eq!(
            err.to_string(),
            "failed to resolve attribute of Repository with name \"value2\": no attribute matches"
        );
    }
}
