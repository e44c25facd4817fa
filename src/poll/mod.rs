//! Polling with deadlines, attempt caps and backoff.
//!
//! A [`Poller`] invokes an operation with an increasing attempt number until
//! a stop predicate accepts its result. Between attempts it waits according
//! to an [`Interval`]; a [`RetryOn`] policy decides which errors are absorbed
//! and which end the session immediately.
//!
//! - **Configuration**: [`PollOptions`] is plain data until [`Poller::new`]
//!   fixes the deadline.
//! - **Injectable time**: every deadline check and wait goes through a
//!   [`Clock`], so the loop can be tested without sleeping.
//! - **Explicit errors**: timeouts and exhausted retries carry the last
//!   operation error as their cause; fatal errors come back untouched.
//!
//! # Quick Start
//!
//! ```rust
//! use poller_bear::{Interval, PollError, PollOptions, Poller};
//! use std::time::Duration;
//!
//! let poller = Poller::new(
//!     PollOptions::new()
//!         .with_interval(Interval::fixed(Duration::from_millis(1)))
//!         .with_max_retries(3)
//!         .stop_when(|status: &u16, _| *status == 200),
//! );
//!
//! let mut attempts = Vec::new();
//! let result = poller.run(|attempt| {
//!     attempts.push(attempt);
//!     Ok::<u16, String>(202)
//! });
//!
//! assert!(matches!(result, Err(PollError::RetriesExhausted { attempts: 3, .. })));
//! assert_eq!(attempts, vec![1, 2, 3]);
//! ```
//!
//! # Interval Strategies
//!
//! - **Fixed**: Same delay after every attempt
//! - **Exponential**: 0.5s, 1s, 2s, 4s, ... (or from a custom base)
//! - **Custom**: Any function of the attempt number
//!
//! # Error Types
//!
//! - [`PollError::Timeout`]: The deadline passed before an attempt could start
//! - [`PollError::RetriesExhausted`]: The attempt cap was reached
//! - [`PollError::Operation`]: A non-retryable error from the operation
//! - [`PollError::InvalidInvocation`]: No operation was supplied

mod clock;
#[cfg(feature = "serde")]
mod config;
mod diagnostics;
mod error;
mod interval;
mod poller;
mod retry_on;
mod session;

pub use clock::{Clock, SystemClock};
#[cfg(feature = "serde")]
pub use config::{ConfigError, Every, IntervalStrategy, PollConfig};
pub use diagnostics::{DiagnosticSink, LogSink, UNBOUNDED_POLL_WARNING};
pub use error::PollError;
pub use interval::{Interval, Jitter, DEFAULT_EXPONENTIAL_BASE, DEFAULT_INTERVAL};
pub use poller::{PollOptions, Poller};
pub use retry_on::RetryOn;
