//! Async Polling Example
//!
//! Waits for a simulated deployment to become healthy without blocking the
//! runtime.
//!
//! Run with: cargo run --example async_polling --features async

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use poller_bear::{Interval, PollOptions, RetryOn};

#[tokio::main]
async fn main() {
    let checks = Arc::new(AtomicU32::new(0));

    let poller = PollOptions::new()
        .with_interval(Interval::exponential_from(Duration::from_millis(25)))
        .with_timeout(Duration::from_secs(5))
        .with_retry_on(RetryOn::Always)
        .stop_when(|healthy: &bool, _| *healthy)
        .build();

    let result = poller
        .run_async(|attempt| {
            let checks = checks.clone();
            async move {
                let n = checks.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                println!("Health check {}", attempt);
                match n {
                    0 => Err("connection refused".to_string()),
                    1 | 2 => Ok(false),
                    _ => Ok(true),
                }
            }
        })
        .await;

    println!("Deployment healthy: {:?}", result);
}
