//! Demonstrates tracing integration with the poll loop
//!
//! Run with: cargo run --example tracing_demo --features tracing

use std::time::Duration;

use poller_bear::{PollOptions, Poller, RetryOn};

fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting tracing demo");

    // Neither a timeout nor a stop condition: logs the unbounded-poll warning.
    let unbounded: Poller<u32, String> = PollOptions::new()
        .with_interval(Duration::from_millis(5))
        .build();
    let _ = unbounded.run(Ok);

    // Each wait is logged at debug level, the timeout at warn level.
    let bounded: Poller<(), String> = PollOptions::new()
        .with_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_millis(35))
        .with_retry_on(RetryOn::Always)
        .build();

    match bounded.run(|attempt| Err(format!("attempt {} failed", attempt))) {
        Ok(()) => tracing::info!("Polling succeeded"),
        Err(e) => tracing::error!("Polling failed: {} (cause: {:?})", e, e.cause()),
    }
}
