//! Per-run state of the attempt loop.
//!
//! A session moves through `Running(n)` until one of the terminal states:
//! the predicate accepts a result, the deadline passes, the attempt cap is
//! reached, or a fatal error comes back from the operation. The blocking
//! and async runners share this state machine and only differ in how they
//! wait between attempts.

use std::time::{Duration, Instant};

use super::error::PollError;
use super::poller::Poller;

/// Result of a single attempt after classification.
#[derive(Debug)]
pub(crate) enum Outcome<T, E> {
    Success(T),
    RetryableFailure(E),
    FatalFailure(E),
}

/// What the runner should do after an attempt.
#[derive(Debug)]
pub(crate) enum Step<T, E> {
    Done(Result<T, PollError<E>>),
    Wait(Duration),
}

pub(crate) struct Session<'p, T, E> {
    poller: &'p Poller<T, E>,
    attempt: u32,
    last_error: Option<E>,
    started: Instant,
}

impl<'p, T, E> Session<'p, T, E> {
    pub(crate) fn start(poller: &'p Poller<T, E>) -> Self {
        Self {
            poller,
            attempt: 1,
            last_error: None,
            started: poller.clock.now(),
        }
    }

    /// Gate the next attempt on the attempt cap, then on the deadline.
    ///
    /// Returns the attempt number to pass to the operation. A cap of zero
    /// exhausts the session before the first attempt.
    pub(crate) fn begin_attempt(&mut self) -> Result<u32, PollError<E>> {
        let completed = self.attempt - 1;

        if let Some(max) = self.poller.max_retries {
            if self.attempt > max {
                let elapsed = self.elapsed();
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = completed, ?elapsed, "polled maximum number of retries");
                return Err(PollError::retries_exhausted(
                    completed,
                    elapsed,
                    self.last_error.take(),
                ));
            }
        }

        if let Some(deadline) = self.poller.deadline {
            let now = self.poller.clock.now();
            if now >= deadline {
                let elapsed = now.saturating_duration_since(self.started);
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = completed, ?elapsed, "polling timed out");
                return Err(PollError::timeout(completed, elapsed, self.last_error.take()));
            }
        }

        Ok(self.attempt)
    }

    pub(crate) fn classify(&self, result: Result<T, E>) -> Outcome<T, E> {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) if self.poller.retry_on.should_retry(&error) => {
                Outcome::RetryableFailure(error)
            }
            Err(error) => Outcome::FatalFailure(error),
        }
    }

    /// Decide between finishing and waiting, advancing the attempt counter
    /// when the loop continues.
    pub(crate) fn settle(&mut self, outcome: Outcome<T, E>) -> Step<T, E> {
        match outcome {
            Outcome::Success(value) if self.poller.accepts(&value, self.attempt) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt = self.attempt, "poll condition met");
                return Step::Done(Ok(value));
            }
            Outcome::Success(_) => {}
            Outcome::RetryableFailure(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt = self.attempt, "attempt failed with a retryable error");
                self.last_error = Some(error);
            }
            Outcome::FatalFailure(error) => return Step::Done(Err(PollError::Operation(error))),
        }

        let delay = self.poller.backoff(self.attempt);
        #[cfg(feature = "tracing")]
        tracing::debug!(attempt = self.attempt, ?delay, "waiting before next attempt");

        self.attempt = self.attempt.saturating_add(1);
        Step::Wait(delay)
    }

    fn elapsed(&self) -> Duration {
        self.poller
            .clock
            .now()
            .saturating_duration_since(self.started)
    }
}
