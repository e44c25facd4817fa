//! # poller-bear
//!
//! Poll an operation until its result is good enough.
//!
//! A poll session calls your operation with an attempt number (1, 2, 3, ...)
//! and decides after each call whether to return, wait and try again, or
//! give up. It gives up when a deadline passes, when the attempt cap is
//! reached, or when the operation fails in a way you did not ask to retry.
//!
//! ## Quick Example
//!
//! ```rust
//! use poller_bear::{Interval, PollOptions, RetryOn};
//! use std::time::Duration;
//!
//! #[derive(Debug, PartialEq)]
//! enum JobError {
//!     Unavailable,
//! }
//!
//! let options = PollOptions::new()
//!     .with_interval(Interval::exponential_from(Duration::from_millis(1)))
//!     .with_timeout(Duration::from_secs(5))
//!     .with_retry_on(RetryOn::kinds([&JobError::Unavailable]))
//!     .stop_when(|state: &String, _| state == "done");
//!
//! let result = poller_bear::poll(options, |attempt| match attempt {
//!     1 => Err(JobError::Unavailable),
//!     2 => Ok("running".to_string()),
//!     _ => Ok("done".to_string()),
//! });
//!
//! assert_eq!(result, Ok("done".to_string()));
//! ```
//!
//! ## Features
//!
//! - `async`: [`Poller::run_async`] for futures, sleeping with tokio
//! - `jitter`: randomized waits via [`Jitter`]
//! - `tracing`: attempt-level events and diagnostics through `tracing`
//! - `serde`: [`PollConfig`] for loading options from config files
//! - `proptest`: `Arbitrary` for [`Interval`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod poll;
pub mod testing;

// Re-exports
pub use poll::{
    Clock, DiagnosticSink, Interval, Jitter, LogSink, PollError, PollOptions, Poller, RetryOn,
    SystemClock, UNBOUNDED_POLL_WARNING,
};
#[cfg(feature = "serde")]
pub use poll::{ConfigError, Every, IntervalStrategy, PollConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a [`Poller`] from `options` and run `operation` with it.
pub fn poll<T, E, F>(options: PollOptions<T, E>, operation: F) -> Result<T, PollError<E>>
where
    F: FnMut(u32) -> Result<T, E>,
{
    Poller::new(options).run(operation)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::poll::{Interval, PollError, PollOptions, Poller, RetryOn};
}
