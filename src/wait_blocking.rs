#![deny(unsafe_code)]

use std::fmt::Debug;
use std::thread;

use tracing::{debug, debug_span};

use crate::condition::Condition;
use crate::error::AwaitError;
use crate::policy::PollPolicy;
use crate::predicate::Predicate;
use crate::session::{PollSession, Step};
use crate::supplier::Supplier;
use crate::TRACING_TARGET;

/// Polls a condition until it is satisfied, blocking the current thread
///
/// The first sample is taken after the poll delay of the policy, subsequent samples are separated by its poll
/// interval. The thread sleeps between samples, for at least a millisecond even if the poll interval is zero. If the
/// deadline falls within an interval, the last sample is taken at the deadline.
///
/// Returns the first sampled value satisfying the condition.
///
/// # Errors
/// Returns [`AwaitError::Timeout`] if the timeout elapses before the condition is satisfied, carrying the value of the
/// final sample, or [`AwaitError::Evaluation`] immediately if sampling or testing fails
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use fieldpoll::{poll_until, Condition, PollPolicy};
///
/// let mut calls = 0;
/// let mut condition = Condition::new(
///     || {
///         calls += 1;
///         calls
///     },
///     |calls: &i32| *calls == 3,
/// );
/// let policy = PollPolicy::new().with_poll_interval(Duration::from_millis(1));
///
/// assert_eq!(poll_until(&mut condition, &policy).unwrap(), 3);
/// ```
pub fn poll_until<S, P>(
    condition: &mut Condition<S, P>,
    policy: &PollPolicy,
) -> Result<S::Output, AwaitError<S::Output>>
where
    S: Supplier,
    S::Output: Debug,
    P: Predicate<S::Output>,
{
    let span = debug_span!(
        target: TRACING_TARGET,
        "poll_until",
        alias = policy.alias(),
        timeout = ?policy.timeout(),
        poll_interval = ?policy.poll_interval()
    );
    let _enter = span.enter();

    let mut session = PollSession::start(policy);

    let delay = session.initial_delay();
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    loop {
        let evaluation = match condition.evaluate() {
            Ok(evaluation) => evaluation,
            Err(err) => {
                debug!(target: TRACING_TARGET, attempts = session.attempts(), %err, "aborted");
                return Err(err.into());
            }
        };

        match session.record(evaluation) {
            Step::Satisfied(value) => {
                debug!(
                    target: TRACING_TARGET,
                    attempts = session.attempts(),
                    elapsed = ?session.elapsed(),
                    "satisfied"
                );
                return Ok(value);
            }

            Step::Wait(interval) => thread::sleep(interval),

            Step::TimedOut(err) => {
                debug!(target: TRACING_TARGET, attempts = err.attempts(), "timed out");
                return Err(err.into());
            }
        }
    }
}
