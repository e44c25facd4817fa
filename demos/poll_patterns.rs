//! Poll Patterns Example
//!
//! Demonstrates the common ways to wait for something with poller-bear:
//! - Waiting for a status to change, with a timeout
//! - Capping the number of attempts
//! - Retrying only transient errors
//! - Exponential and custom intervals
//! - Inspecting the cause of a timeout

use std::fmt;
use std::time::Duration;

use poller_bear::{Interval, PollError, PollOptions, Poller, RetryOn};

#[derive(Debug, Clone, PartialEq)]
enum JobStatus {
    Queued,
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
enum ApiError {
    Unavailable,
    Unauthorized,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unavailable => write!(f, "service unavailable"),
            ApiError::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

impl std::error::Error for ApiError {}

fn job_status(attempt: u32) -> Result<JobStatus, ApiError> {
    match attempt {
        1 => Ok(JobStatus::Queued),
        2 | 3 => Ok(JobStatus::Running),
        _ => Ok(JobStatus::Finished),
    }
}

// ==================== Wait With Timeout ====================

fn example_wait_for_status() {
    println!("\n=== Example 1: Wait for a job to finish ===");

    let poller = Poller::new(
        PollOptions::new()
            .with_interval(Duration::from_millis(20))
            .with_timeout(Duration::from_secs(2))
            .stop_when(|status: &JobStatus, _| *status == JobStatus::Finished),
    );

    let result = poller.run(|attempt| {
        let status = job_status(attempt);
        println!("  Attempt {}: {:?}", attempt, status);
        status
    });

    println!("  Result: {:?}", result);
}

// ==================== Attempt Cap ====================

fn example_attempt_cap() {
    println!("\n=== Example 2: Give up after three attempts ===");

    let result = poller_bear::poll(
        PollOptions::new()
            .with_interval(Duration::from_millis(10))
            .with_max_retries(3)
            .stop_when(|status: &JobStatus, _| *status == JobStatus::Finished),
        |attempt| {
            println!("  Attempt {}", attempt);
            Ok::<_, ApiError>(JobStatus::Running)
        },
    );

    match result {
        Err(PollError::RetriesExhausted {
            attempts, elapsed, ..
        }) => println!("  Gave up after {} attempts ({:?})", attempts, elapsed),
        other => println!("  Unexpected: {:?}", other),
    }
}

// ==================== Retry Filtering ====================

fn example_retry_transient_only() {
    println!("\n=== Example 3: Retry transient errors, fail fast on others ===");

    let poller = Poller::new(
        PollOptions::new()
            .with_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(1))
            .with_retry_on(RetryOn::kinds([&ApiError::Unavailable])),
    );

    let recovered = poller.run(|attempt| {
        if attempt < 3 {
            println!("  Attempt {}: unavailable", attempt);
            Err(ApiError::Unavailable)
        } else {
            println!("  Attempt {}: ok", attempt);
            Ok("payload")
        }
    });
    println!("  Transient errors: {:?}", recovered);

    let fatal = poller.run(|attempt| {
        println!("  Attempt {}: unauthorized", attempt);
        Err(ApiError::Unauthorized)
    });
    println!("  Fatal error: {:?}", fatal);
}

// ==================== Interval Strategies ====================

fn example_intervals() {
    println!("\n=== Example 4: Interval strategies ===");

    let exponential = Interval::exponential();
    let custom = Interval::custom(|attempt| Duration::from_millis(100 * attempt as u64));

    for attempt in 1..=5 {
        println!(
            "  After attempt {}: exponential {:?}, custom {:?}",
            attempt,
            exponential.delay_for_attempt(attempt),
            custom.delay_for_attempt(attempt)
        );
    }
}

// ==================== Timeout Cause ====================

fn example_timeout_cause() {
    println!("\n=== Example 5: Timeouts keep the last error ===");

    let poller: Poller<JobStatus, ApiError> = Poller::new(
        PollOptions::new()
            .with_interval(Interval::exponential_from(Duration::from_millis(10)))
            .with_timeout(Duration::from_millis(100))
            .with_retry_on(RetryOn::Always),
    );

    let err = poller
        .run(|_| Err(ApiError::Unavailable))
        .expect_err("service never comes back");

    println!("  Error: {}", err);
    if let Some(source) = std::error::Error::source(&err) {
        println!("  Caused by: {}", source);
    }
}

fn main() {
    println!("Poll Patterns Examples");
    println!("======================");

    example_wait_for_status();
    example_attempt_cap();
    example_retry_transient_only();
    example_intervals();
    example_timeout_cause();

    println!("\n=== All examples completed ===");
}
