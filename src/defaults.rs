//! Process-wide default timing parameters
//!
//! Every [`PollPolicy`](crate::PollPolicy) and every [`ConditionFactory`](crate::ConditionFactory) starts from the
//! defaults that are current at the time of its creation. Changing the defaults does not affect policies that
//! already exist.
//!
//! The defaults are shared by all threads of the process. Tests changing them should restore them using [`reset`]
//! and must not run concurrently with tests relying on them.

#![deny(unsafe_code)]

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tracing::debug;

use crate::policy::PollInterval;
use crate::TRACING_TARGET;

static DEFAULTS: RwLock<Defaults> = RwLock::new(Defaults::FACTORY);

/// A snapshot of the default timing parameters
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Defaults {
    /// The maximum time to wait for a condition
    pub timeout: Duration,

    /// The delay before the first sample
    pub poll_delay: Duration,

    /// The intervals between samples
    pub poll_interval: PollInterval,
}

impl Defaults {
    /// The defaults in effect before any of them has been changed
    ///
    /// These are a timeout of 10 seconds, no poll delay and a fixed poll interval of 100 milliseconds.
    pub const FACTORY: Self = Self {
        timeout: Duration::from_secs(10),
        poll_delay: Duration::ZERO,
        poll_interval: PollInterval::fixed(Duration::from_millis(100)),
    };
}

impl Default for Defaults {
    fn default() -> Self {
        Self::FACTORY
    }
}

/// Returns a snapshot of the current defaults
pub fn current() -> Defaults {
    *DEFAULTS.read().unwrap_or_else(PoisonError::into_inner)
}

/// Sets the default timeout
pub fn set_timeout(timeout: Duration) {
    update(|defaults| defaults.timeout = timeout);
}

/// Sets the default delay before the first sample
pub fn set_poll_delay(poll_delay: Duration) {
    update(|defaults| defaults.poll_delay = poll_delay);
}

/// Sets the default intervals between samples
pub fn set_poll_interval(poll_interval: impl Into<PollInterval>) {
    let poll_interval = poll_interval.into();
    update(|defaults| defaults.poll_interval = poll_interval);
}

/// Restores the factory defaults
///
/// Resetting is idempotent.
pub fn reset() {
    update(|defaults| *defaults = Defaults::FACTORY);
}

fn update<F>(f: F)
where
    F: FnOnce(&mut Defaults),
{
    let mut defaults = DEFAULTS.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut defaults);

    debug!(
        target: TRACING_TARGET,
        timeout = ?defaults.timeout,
        poll_delay = ?defaults.poll_delay,
        poll_interval = ?defaults.poll_interval,
        "changed defaults"
    );
}
