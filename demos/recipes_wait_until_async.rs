use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fieldpoll::PollInterval;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_span_events(FmtSpan::ACTIVE)
        .with_thread_ids(true)
        .init();

    let counter = Arc::new(AtomicU32::new(0));
    let counter2 = Arc::clone(&counter);

    let handle = tokio::spawn(async move {
        info!("Waiting ...");
        let value = fieldpoll::wait()
            .at_most(Duration::from_secs(6))
            .with_poll_interval(PollInterval::fibonacci(Duration::from_millis(50)))
            .until_async(|| counter2.load(Ordering::SeqCst), |value| *value > 1)
            .await
            .expect("Failed to wait for counter update");
        info!(value, "Counter updated");
    });

    for i in 1..3 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        counter.store(i, Ordering::SeqCst);
    }

    handle.await.expect("Failed to join task");
}
