//! Waiting on an attribute resolved by name, type and marker

use std::error::Error;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fieldpoll::{declare_attributes, field_in, field_in_type, Marker};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;

struct Persisted;
impl Marker for Persisted {}

static INSTANCES: AtomicU64 = AtomicU64::new(0);

struct OrderRepository {
    status: AtomicI32,
    retries: AtomicI32,
}

impl OrderRepository {
    fn new() -> Self {
        INSTANCES.fetch_add(1, Ordering::SeqCst);

        Self {
            status: AtomicI32::new(0),
            retries: AtomicI32::new(0),
        }
    }
}

declare_attributes! {
    OrderRepository {
        #[marker(Persisted)]
        status: i32 = |repository: &OrderRepository| repository.status.load(Ordering::SeqCst),
        retries: i32 = |repository: &OrderRepository| repository.retries.load(Ordering::SeqCst),
        static instances: u64 = || INSTANCES.load(Ordering::SeqCst),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_span_events(FmtSpan::ACTIVE)
        .init();

    let repository = Arc::new(OrderRepository::new());
    let repository2 = Arc::clone(&repository);

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        repository2.retries.store(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(500));
        repository2.status.store(2, Ordering::SeqCst);
    });

    // two `i32` attributes, so the marker is needed to tell them apart
    let status = fieldpoll::wait()
        .at_most(Duration::from_secs(3))
        .poll_interval(Duration::from_millis(100))
        .until(
            field_in(&*repository).of_type::<i32>().and_annotated_with::<Persisted>(),
            |status| *status == 2,
        )?;
    info!(status, "Order persisted");

    let instances = field_in_type::<OrderRepository>().with_name("instances").resolve()?;
    info!(instances = ?instances.get()?, "Repositories created");

    match field_in(&*repository).of_type::<i32>().resolve() {
        Ok(_) => info!("Unexpectedly resolved"),
        Err(err) => info!(%err, "Ambiguous criteria"),
    }

    handle.join().map_err(|_| "Failed to join thread")?;

    Ok(())
}
