//! Timing parameters of polling loops

#![deny(unsafe_code)]

use std::time::Duration;

use crate::defaults;

/// The intervals between consecutive samples of a polling loop
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PollInterval {
    /// The same interval between all samples
    Fixed(Duration),

    /// Intervals growing along the Fibonacci sequence: `1, 1, 2, 3, 5, ...` times `unit`
    Fibonacci {
        /// The first interval
        unit: Duration,
    },

    /// Intervals growing linearly: `start, start + step, start + 2 * step, ...`
    Linear {
        /// The first interval
        start: Duration,

        /// The amount by which each interval exceeds the previous one
        step: Duration,
    },
}

impl PollInterval {
    /// Creates a fixed poll interval
    pub const fn fixed(interval: Duration) -> Self {
        Self::Fixed(interval)
    }

    /// Creates a poll interval growing along the Fibonacci sequence
    pub const fn fibonacci(unit: Duration) -> Self {
        Self::Fibonacci { unit }
    }

    /// Creates a linearly growing poll interval
    pub const fn linear(start: Duration, step: Duration) -> Self {
        Self::Linear { start, step }
    }

    /// Returns the (infinite) sequence of intervals
    pub fn intervals(&self) -> Intervals {
        let state = match *self {
            Self::Fixed(interval) => IntervalState::Fixed(interval),
            Self::Fibonacci { unit } => IntervalState::Fibonacci {
                unit,
                current: 1,
                next: 1,
            },
            Self::Linear { start, step } => IntervalState::Linear { current: start, step },
        };

        Intervals { state }
    }
}

impl From<Duration> for PollInterval {
    fn from(interval: Duration) -> Self {
        Self::Fixed(interval)
    }
}

/// Iterator over the intervals of a [`PollInterval`]
///
/// This never returns `None`. Intervals saturate instead of overflowing.
#[derive(Clone, Debug)]
pub struct Intervals {
    state: IntervalState,
}

#[derive(Clone, Debug)]
enum IntervalState {
    Fixed(Duration),
    Fibonacci { unit: Duration, current: u32, next: u32 },
    Linear { current: Duration, step: Duration },
}

impl Iterator for Intervals {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let interval = match &mut self.state {
            IntervalState::Fixed(interval) => *interval,
            IntervalState::Fibonacci { unit, current, next } => {
                let interval = unit.saturating_mul(*current);
                (*current, *next) = (*next, current.saturating_add(*next));
                interval
            }
            IntervalState::Linear { current, step } => {
                let interval = *current;
                *current = current.saturating_add(*step);
                interval
            }
        };

        Some(interval)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// The timing parameters of a single polling loop
///
/// [`PollPolicy::new`] starts from the current process-wide [`defaults`](crate::defaults).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollPolicy {
    timeout: Duration,
    poll_delay: Duration,
    poll_interval: PollInterval,
    alias: Option<String>,
}

impl PollPolicy {
    /// Creates a policy from the current process-wide defaults
    pub fn new() -> Self {
        let defaults = defaults::current();

        Self {
            timeout: defaults.timeout,
            poll_delay: defaults.poll_delay,
            poll_interval: defaults.poll_interval,
            alias: None,
        }
    }

    /// Sets the maximum time to wait for the condition
    ///
    /// [`Duration::MAX`] (or any timeout too large to be represented as a deadline) means waiting forever.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the delay before the first sample
    pub fn with_poll_delay(mut self, poll_delay: Duration) -> Self {
        self.poll_delay = poll_delay;
        self
    }

    /// Sets the intervals between samples
    pub fn with_poll_interval(mut self, poll_interval: impl Into<PollInterval>) -> Self {
        self.poll_interval = poll_interval.into();
        self
    }

    /// Sets an alias naming the condition in diagnostics
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns the maximum time to wait for the condition
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the delay before the first sample
    pub fn poll_delay(&self) -> Duration {
        self.poll_delay
    }

    /// Returns the intervals between samples
    pub fn poll_interval(&self) -> PollInterval {
        self.poll_interval
    }

    /// Returns the alias of the condition, if any
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new()
    }
}
