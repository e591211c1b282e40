use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fieldpoll::{fallible, poll_until, Condition, PollInterval, PollPolicy};

#[test]
fn wait_until_blocking() {
    let ready = Arc::new(AtomicBool::new(false));

    let (tx, rx) = crossbeam_channel::unbounded();

    let handle = {
        let ready = Arc::clone(&ready);

        thread::spawn(move || {
            let result = fieldpoll::wait()
                .at_most(Duration::from_secs(3))
                .poll_interval(Duration::from_millis(10))
                .until_true(|| ready.load(Ordering::SeqCst));

            tx.send(result.is_ok()).unwrap();
        })
    };

    thread::sleep(Duration::from_millis(300));
    assert!(rx.try_recv().is_err());

    ready.store(true, Ordering::SeqCst);
    let satisfied = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert!(satisfied);

    handle.join().unwrap();
}

#[test]
fn wait_until_blocking_stops_sampling_when_satisfied() {
    let samples = Arc::new(AtomicUsize::new(0));

    let value = fieldpoll::wait()
        .poll_interval(Duration::from_millis(1))
        .until(
            || samples.fetch_add(1, Ordering::SeqCst) + 1,
            |value| *value == 3,
        )
        .unwrap();

    thread::sleep(Duration::from_millis(20));

    assert_eq!(value, 3);
    assert_eq!(samples.load(Ordering::SeqCst), 3);
}

#[test]
fn wait_until_blocking_timeout() {
    let samples = AtomicUsize::new(0);
    let start = Instant::now();

    let err = fieldpoll::wait()
        .at_most(Duration::from_millis(100))
        .poll_interval(Duration::from_millis(30))
        .until(|| samples.fetch_add(1, Ordering::SeqCst), |_| false)
        .unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(100));

    let fieldpoll::AwaitError::Timeout(err) = err else {
        panic!("expected timeout");
    };
    let sampled = samples.load(Ordering::SeqCst);
    assert_eq!(err.attempts() as usize, sampled);
    assert_eq!(err.last_value(), Some(&(sampled - 1)));
}

#[test]
fn wait_until_blocking_samples_at_deadline() {
    let start = Instant::now();

    // the interval never elapses within the timeout, so the second sample is taken at the deadline
    let value = fieldpoll::wait()
        .at_most(Duration::from_millis(100))
        .poll_interval(Duration::from_secs(10))
        .until(|| start.elapsed(), |elapsed| *elapsed >= Duration::from_millis(100))
        .unwrap();

    assert!(value < Duration::from_secs(10));
}

#[test]
fn wait_until_blocking_zero_timeout_samples_once() {
    let samples = AtomicUsize::new(0);

    let err = fieldpoll::wait()
        .at_most(Duration::ZERO)
        .until(|| samples.fetch_add(1, Ordering::SeqCst), |_| false)
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(samples.load(Ordering::SeqCst), 1);
}

#[test]
fn wait_until_blocking_zero_interval_suspends_between_samples() {
    let samples = AtomicUsize::new(0);

    let err = fieldpoll::wait()
        .at_most(Duration::from_millis(50))
        .poll_interval(Duration::ZERO)
        .until(|| samples.fetch_add(1, Ordering::SeqCst), |_| false)
        .unwrap_err();

    // at least a millisecond passes between two samples
    assert!(err.is_timeout());
    assert!(samples.load(Ordering::SeqCst) <= 100);
}

#[test]
fn wait_until_blocking_evaluation_error() {
    let err = fieldpoll::wait()
        .until(fallible(|| Err::<i32, _>("connection lost")), |_| false)
        .unwrap_err();

    assert!(err.is_evaluation());
    assert_eq!(err.to_string(), "failed to evaluate condition: connection lost");
}

#[test]
fn poll_until_with_fibonacci_interval() {
    let samples = AtomicUsize::new(0);
    let mut condition = Condition::new(|| samples.fetch_add(1, Ordering::SeqCst) + 1, |value: &usize| *value == 5);
    let policy = PollPolicy::new()
        .with_timeout(Duration::from_secs(2))
        .with_poll_interval(PollInterval::fibonacci(Duration::from_millis(5)));
    let start = Instant::now();

    let value = poll_until(&mut condition, &policy).unwrap();

    // waits of 5, 5, 10 and 15 ms separate the five samples
    assert_eq!(value, 5);
    assert!(start.elapsed() >= Duration::from_millis(35));
}
