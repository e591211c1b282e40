//! Using `wait().until(...)` with a closure

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_span_events(FmtSpan::ACTIVE)
        .with_thread_ids(true)
        .init();

    let counter = Arc::new(AtomicU32::new(0));
    let counter2 = Arc::clone(&counter);

    let handle = thread::spawn(move || {
        info!("Waiting ...");

        let value = fieldpoll::wait_with_alias("counter exceeds 1")
            .at_most(Duration::from_secs(6))
            .poll_interval(Duration::from_millis(250))
            .until(|| counter2.load(Ordering::SeqCst), |value| *value > 1)
            .unwrap();

        info!(value, "Counter updated");
    });

    for i in 1..3 {
        thread::sleep(Duration::from_secs(1));
        counter.store(i, Ordering::SeqCst);
    }

    handle.join().unwrap();

    Ok(())
}
