#![deny(unsafe_code)]

use std::fmt::Debug;

use tokio::time;
use tracing::{debug, debug_span, Instrument};

use crate::condition::Condition;
use crate::error::AwaitError;
use crate::policy::PollPolicy;
use crate::predicate::Predicate;
use crate::session::{PollSession, Step};
use crate::supplier::Supplier;
use crate::TRACING_TARGET;

/// Polls a condition until it is satisfied, asynchronously
///
/// This behaves exactly like [`poll_until`](crate::poll_until), except that it yields to the runtime between samples
/// using [`tokio::time::sleep`] instead of blocking the current thread. As there, a zero poll interval still
/// suspends for a millisecond. Sampling itself is synchronous.
///
/// Requires a Tokio runtime with the time driver enabled.
///
/// # Errors
/// Returns [`AwaitError::Timeout`] if the timeout elapses before the condition is satisfied, carrying the value of the
/// final sample, or [`AwaitError::Evaluation`] immediately if sampling or testing fails
pub async fn poll_until_async<S, P>(
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
        "poll_until_async",
        alias = policy.alias(),
        timeout = ?policy.timeout(),
        poll_interval = ?policy.poll_interval()
    );

    poll_loop(condition, policy).instrument(span).await
}

async fn poll_loop<S, P>(
    condition: &mut Condition<S, P>,
    policy: &PollPolicy,
) -> Result<S::Output, AwaitError<S::Output>>
where
    S: Supplier,
    S::Output: Debug,
    P: Predicate<S::Output>,
{
    let mut session = PollSession::start(policy);

    let delay = session.initial_delay();
    if !delay.is_zero() {
        time::sleep(delay).await;
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

            Step::Wait(interval) => time::sleep(interval).await,

            Step::TimedOut(err) => {
                debug!(target: TRACING_TARGET, attempts = err.attempts(), "timed out");
                return Err(err.into());
            }
        }
    }
}
