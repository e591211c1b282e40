//! Fluent registration of conditions to wait for
//!
//! This is the usual entry point of the crate:
//!
//! ```
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! let counter = Arc::new(AtomicI32::new(0));
//!
//! thread::spawn({
//!     let counter = Arc::clone(&counter);
//!     move || {
//!         thread::sleep(Duration::from_millis(50));
//!         counter.store(1, Ordering::SeqCst);
//!     }
//! });
//!
//! let value = fieldpoll::wait()
//!     .at_most(Duration::from_secs(2))
//!     .poll_interval(Duration::from_millis(10))
//!     .until(|| counter.load(Ordering::SeqCst), |value| *value == 1)
//!     .unwrap();
//!
//! assert_eq!(value, 1);
//! ```

#![deny(unsafe_code)]

use std::fmt::Debug;
use std::time::Duration;

use crate::condition::Condition;
use crate::error::AwaitError;
use crate::policy::{PollInterval, PollPolicy};
use crate::predicate::Predicate;
use crate::supplier::{IntoSupplier, SourceOutput, Supplier};
use crate::wait_blocking::poll_until;

/// Starts registering a condition, using the current [`defaults`](crate::defaults)
pub fn wait() -> ConditionFactory {
    ConditionFactory::new()
}

/// Starts registering a condition with an alias naming it in diagnostics
pub fn wait_with_alias(alias: impl Into<String>) -> ConditionFactory {
    ConditionFactory::new().alias(alias)
}

/// Builder for waiting on conditions
///
/// A factory carries the timing parameters of a [`PollPolicy`]. It can be reused for any number of conditions, each
/// of which is polled independently.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConditionFactory {
    policy: PollPolicy,
}

impl ConditionFactory {
    /// Creates a factory from the current process-wide defaults
    pub fn new() -> Self {
        Self {
            policy: PollPolicy::new(),
        }
    }

    /// Sets an alias naming the condition in diagnostics
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self {
            policy: self.policy.with_alias(alias),
        }
    }

    /// Sets the maximum time to wait for the condition
    pub fn at_most(self, timeout: Duration) -> Self {
        Self {
            policy: self.policy.with_timeout(timeout),
        }
    }

    /// Waits for the condition without a timeout
    pub fn forever(self) -> Self {
        self.at_most(Duration::MAX)
    }

    /// Sets the delay before the first sample
    pub fn poll_delay(self, poll_delay: Duration) -> Self {
        Self {
            policy: self.policy.with_poll_delay(poll_delay),
        }
    }

    /// Sets a fixed interval between samples
    pub fn poll_interval(self, poll_interval: Duration) -> Self {
        self.with_poll_interval(PollInterval::Fixed(poll_interval))
    }

    /// Sets the intervals between samples
    pub fn with_poll_interval(self, poll_interval: PollInterval) -> Self {
        Self {
            policy: self.policy.with_poll_interval(poll_interval),
        }
    }

    /// Returns the policy that conditions registered through this factory are polled with
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Waits until `predicate` holds for a value sampled from `source`, blocking the current thread
    ///
    /// The source is converted into a supplier before the first sample is taken. For a
    /// [`FieldQuery`](crate::FieldQuery) this means resolving its attribute.
    ///
    /// # Errors
    /// Returns [`AwaitError::AttributeNotFound`] without sampling if the source cannot be resolved, otherwise see
    /// [`poll_until`]
    pub fn until<Src, F>(
        &self,
        source: Src,
        predicate: F,
    ) -> Result<SourceOutput<Src>, AwaitError<SourceOutput<Src>>>
    where
        Src: IntoSupplier,
        SourceOutput<Src>: Debug,
        F: FnMut(&SourceOutput<Src>) -> bool,
    {
        self.until_matches(source, predicate)
    }

    /// Waits until an arbitrary [`Predicate`] holds for a value sampled from `source`, blocking the current thread
    ///
    /// # Errors
    /// Same as [`until`](ConditionFactory::until)
    pub fn until_matches<Src, P>(
        &self,
        source: Src,
        predicate: P,
    ) -> Result<SourceOutput<Src>, AwaitError<SourceOutput<Src>>>
    where
        Src: IntoSupplier,
        SourceOutput<Src>: Debug,
        P: Predicate<SourceOutput<Src>>,
    {
        let mut condition = Condition::new(source.into_supplier()?, predicate);
        poll_until(&mut condition, &self.policy)
    }

    /// Waits until a `bool` source yields `true`, blocking the current thread
    ///
    /// # Errors
    /// Same as [`until`](ConditionFactory::until)
    pub fn until_true<Src>(&self, source: Src) -> Result<(), AwaitError<bool>>
    where
        Src: IntoSupplier,
        Src::Supplier: Supplier<Output = bool>,
    {
        self.until_matches(source, |value: &bool| *value).map(|_| ())
    }
}

#[cfg(feature = "wait_async")]
impl ConditionFactory {
    /// Waits until `predicate` holds for a value sampled from `source`, asynchronously
    ///
    /// # Errors
    /// Same as [`until`](ConditionFactory::until)
    pub async fn until_async<Src, F>(
        &self,
        source: Src,
        predicate: F,
    ) -> Result<SourceOutput<Src>, AwaitError<SourceOutput<Src>>>
    where
        Src: IntoSupplier,
        SourceOutput<Src>: Debug,
        F: FnMut(&SourceOutput<Src>) -> bool,
    {
        self.until_matches_async(source, predicate).await
    }

    /// Waits until an arbitrary [`Predicate`] holds for a value sampled from `source`, asynchronously
    ///
    /// # Errors
    /// Same as [`until`](ConditionFactory::until)
    pub async fn until_matches_async<Src, P>(
        &self,
        source: Src,
        predicate: P,
    ) -> Result<SourceOutput<Src>, AwaitError<SourceOutput<Src>>>
    where
        Src: IntoSupplier,
        SourceOutput<Src>: Debug,
        P: Predicate<SourceOutput<Src>>,
    {
        let mut condition = Condition::new(source.into_supplier()?, predicate);
        crate::wait_async::poll_until_async(&mut condition, &self.policy).await
    }

    /// Waits until a `bool` source yields `true`, asynchronously
    ///
    /// # Errors
    /// Same as [`until`](ConditionFactory::until)
    pub async fn until_true_async<Src>(&self, source: Src) -> Result<(), AwaitError<bool>>
    where
        Src: IntoSupplier,
        Src::Supplier: Supplier<Output = bool>,
    {
        self.until_matches_async(source, |value: &bool| *value)
            .await
            .map(|_| ())
    }
}
