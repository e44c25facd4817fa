//! Time source for deadlines and backoff waits.

use std::time::{Duration, Instant};

#[cfg(feature = "async")]
use futures::future::BoxFuture;

/// Source of the current time and of the waits between attempts.
///
/// Every deadline and backoff computation in a [`Poller`](crate::Poller)
/// goes through its clock, so tests can swap in
/// [`ManualClock`](crate::testing::ManualClock) and run without sleeping.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Wait for `duration` without blocking the executor.
    ///
    /// The default implementation is `tokio::time::sleep`, which must be
    /// polled inside a tokio runtime.
    #[cfg(feature = "async")]
    fn sleep_async(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// The real clock: `Instant::now` and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
