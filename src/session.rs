//! Bookkeeping of a single polling loop run

#![deny(unsafe_code)]

use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::condition::Evaluation;
use crate::error::ConditionTimeoutError;
use crate::policy::{Intervals, PollPolicy};
use crate::TRACING_TARGET;

/// The shortest wait between two samples, so that a zero poll interval still suspends the loop
pub(crate) const MIN_WAIT: Duration = Duration::from_millis(1);

/// What a polling loop does after recording an evaluation
#[derive(Debug)]
pub(crate) enum Step<T>
where
    T: Debug,
{
    /// The condition is satisfied by the contained value
    Satisfied(T),

    /// Sleep for the contained duration, then sample again
    Wait(Duration),

    /// The deadline has passed
    TimedOut(ConditionTimeoutError<T>),
}

/// The transient state of one polling loop run
///
/// The session never sleeps itself, so it is shared between the blocking and the async loop.
#[derive(Debug)]
pub(crate) struct PollSession<T> {
    start: Instant,
    deadline: Option<Instant>,
    timeout: Duration,
    poll_delay: Duration,
    intervals: Intervals,
    attempts: u32,
    last_value: Option<T>,
    alias: Option<String>,
}

impl<T> PollSession<T>
where
    T: Debug,
{
    pub(crate) fn start(policy: &PollPolicy) -> Self {
        Self::start_at(Instant::now(), policy)
    }

    fn start_at(start: Instant, policy: &PollPolicy) -> Self {
        Self {
            start,
            // no deadline if the timeout is too large to be represented, i.e. wait forever
            deadline: start.checked_add(policy.timeout()),
            timeout: policy.timeout(),
            poll_delay: policy.poll_delay(),
            intervals: policy.poll_interval().intervals(),
            attempts: 0,
            last_value: None,
            alias: policy.alias().map(String::from),
        }
    }

    /// Returns how long to wait before the first sample
    pub(crate) fn initial_delay(&self) -> Duration {
        self.poll_delay.min(self.timeout)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Records the outcome of one evaluation and decides on the next step
    pub(crate) fn record(&mut self, evaluation: Evaluation<T>) -> Step<T> {
        self.record_at(Instant::now(), evaluation)
    }

    fn record_at(&mut self, now: Instant, evaluation: Evaluation<T>) -> Step<T> {
        self.attempts = self.attempts.saturating_add(1);
        let (satisfied, value) = evaluation.into_parts();

        trace!(
            target: TRACING_TARGET,
            attempt = self.attempts,
            satisfied,
            value = ?value,
            "sampled condition"
        );

        if satisfied {
            return Step::Satisfied(value);
        }

        self.last_value = Some(value);
        let interval = self.intervals.next().unwrap_or_default().max(MIN_WAIT);

        match self.deadline {
            Some(deadline) if now >= deadline => Step::TimedOut(ConditionTimeoutError {
                alias: self.alias.take(),
                timeout: self.timeout,
                attempts: self.attempts,
                last_value: self.last_value.take(),
            }),
            // the wait is clipped so that one more sample is taken right at the deadline
            Some(deadline) => Step::Wait(interval.min(deadline - now)),
            None => Step::Wait(interval),
        }
    }
}
