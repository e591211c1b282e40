use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::repository::ValueHolder;

/// Sets the value of a repository to `1` from another thread after a delay
#[derive(Debug)]
pub struct Asynch<R> {
    repository: Arc<R>,
    delay: Duration,
}

impl<R> Asynch<R>
where
    R: ValueHolder + Send + Sync + 'static,
{
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    pub fn new(repository: &Arc<R>) -> Self {
        Self {
            repository: Arc::clone(repository),
            delay: Self::DEFAULT_DELAY,
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn perform(self) -> JoinHandle<()> {
        thread::spawn(move || {
            thread::sleep(self.delay);
            self.repository.set_value(1);
        })
    }
}
