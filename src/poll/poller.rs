//! Poll configuration and the attempt loop runners.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};
use super::diagnostics::{DiagnosticSink, LogSink, UNBOUNDED_POLL_WARNING};
use super::error::PollError;
use super::interval::{Interval, Jitter};
use super::retry_on::RetryOn;
use super::session::{Session, Step};

type StopPredicate<T> = Arc<dyn Fn(&T, u32) -> bool + Send + Sync>;

/// Options for a poll session, consumed by [`Poller::new`].
///
/// Defaults: a fixed 1 second interval, no timeout, no attempt cap, accept
/// the first successful result, and never retry on errors.
///
/// # Examples
///
/// ```rust
/// use poller_bear::{Interval, PollOptions, Poller, RetryOn};
/// use std::time::Duration;
///
/// let poller = Poller::new(
///     PollOptions::new()
///         .with_interval(Interval::fixed(Duration::from_millis(1)))
///         .with_timeout(Duration::from_secs(5))
///         .with_retry_on(RetryOn::Always)
///         .stop_when(|ready: &bool, _attempt| *ready),
/// );
///
/// let result = poller.run(|attempt| Ok::<_, String>(attempt >= 3));
/// assert_eq!(result, Ok(true));
/// ```
pub struct PollOptions<T, E> {
    interval: Interval,
    jitter: Jitter,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    stop_when: Option<StopPredicate<T>>,
    retry_on: RetryOn<E>,
    clock: Arc<dyn Clock>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<T, E> PollOptions<T, E> {
    /// Options with every setting at its default.
    pub fn new() -> Self {
        Self {
            interval: Interval::default(),
            jitter: Jitter::None,
            timeout: None,
            max_retries: None,
            stop_when: None,
            retry_on: RetryOn::Never,
            clock: Arc::new(SystemClock),
            diagnostics: Arc::new(LogSink),
        }
    }

    /// Set the wait between attempts.
    ///
    /// Accepts an [`Interval`] or a plain `Duration` for a fixed interval.
    pub fn with_interval(mut self, interval: impl Into<Interval>) -> Self {
        self.interval = interval.into();
        self
    }

    /// Randomize each computed wait.
    ///
    /// **Note**: Requires the `jitter` feature. Without it, this has no effect.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Stop starting new attempts once `timeout` has passed.
    ///
    /// The deadline is fixed when the [`Poller`] is created, not when it runs.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Make at most `n` attempts in total.
    ///
    /// A cap of zero fails every run with [`PollError::RetriesExhausted`]
    /// before the operation is invoked.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Accept a result only when `predicate(&result, attempt)` returns true.
    pub fn stop_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T, u32) -> bool + Send + Sync + 'static,
    {
        self.stop_when = Some(Arc::new(predicate));
        self
    }

    /// Choose which operation errors are retried instead of propagated.
    ///
    /// Accepts a [`RetryOn`] or a `bool` (`true` retries every error).
    pub fn with_retry_on(mut self, retry_on: impl Into<RetryOn<E>>) -> Self {
        self.retry_on = retry_on.into();
        self
    }

    /// Read time and sleep through `clock`.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Send configuration warnings to `sink` instead of the log.
    pub fn with_diagnostics<S>(mut self, sink: S) -> Self
    where
        S: DiagnosticSink + 'static,
    {
        self.diagnostics = Arc::new(sink);
        self
    }

    /// Shorthand for [`Poller::new`].
    pub fn build(self) -> Poller<T, E> {
        Poller::new(self)
    }
}

impl<T, E> Default for PollOptions<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for PollOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("interval", &self.interval)
            .field("jitter", &self.jitter)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("stop_when", &self.stop_when.as_ref().map(|_| "<fn>"))
            .field("retry_on", &self.retry_on)
            .finish_non_exhaustive()
    }
}

/// A configured poll session.
///
/// A poller repeatedly invokes an operation with the attempt number
/// (starting at 1) until one of:
///
/// - the stop predicate accepts a result, which is returned;
/// - the deadline has passed when an attempt is about to start
///   ([`PollError::Timeout`]);
/// - the attempt cap is used up ([`PollError::RetriesExhausted`]);
/// - the operation returns an error the retry policy does not absorb
///   ([`PollError::Operation`]).
///
/// Rejected results and retried errors are both followed by a backoff wait,
/// including after the last allowed attempt. The deadline is only checked
/// before an attempt, so an attempt that has started always completes.
pub struct Poller<T, E> {
    pub(super) interval: Interval,
    pub(super) jitter: Jitter,
    pub(super) deadline: Option<Instant>,
    pub(super) max_retries: Option<u32>,
    pub(super) stop_when: Option<StopPredicate<T>>,
    pub(super) retry_on: RetryOn<E>,
    pub(super) clock: Arc<dyn Clock>,
}

impl<T, E> Poller<T, E> {
    /// Build a poller, computing the deadline from the options' clock.
    ///
    /// Warns through the configured diagnostic sink when neither a timeout
    /// nor a stop predicate is set.
    pub fn new(options: PollOptions<T, E>) -> Self {
        let PollOptions {
            interval,
            jitter,
            timeout,
            max_retries,
            stop_when,
            retry_on,
            clock,
            diagnostics,
        } = options;

        if timeout.is_none() && stop_when.is_none() {
            diagnostics.warn(UNBOUNDED_POLL_WARNING);
        }

        // A deadline past what `Instant` can represent is no deadline at all.
        let deadline = timeout.and_then(|t| clock.now().checked_add(t));

        Self {
            interval,
            jitter,
            deadline,
            max_retries,
            stop_when,
            retry_on,
            clock,
        }
    }

    /// The configured interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The absolute deadline, if a timeout was configured.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The attempt cap, if any.
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// The retry policy.
    pub fn retry_on(&self) -> &RetryOn<E> {
        &self.retry_on
    }

    /// Wait to apply after `attempt`, with jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.interval.delay_for_attempt(attempt))
    }

    pub(super) fn accepts(&self, value: &T, attempt: u32) -> bool {
        match &self.stop_when {
            Some(predicate) => predicate(value, attempt),
            None => true,
        }
    }

    /// Poll `operation`, blocking the current thread between attempts.
    ///
    /// Without a cap, the attempt number stops at `u32::MAX` and repeats.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use poller_bear::{PollOptions, Poller};
    /// use std::time::Duration;
    ///
    /// let poller = PollOptions::new()
    ///     .with_interval(Duration::from_millis(1))
    ///     .stop_when(|_: &u32, attempt| attempt >= 3)
    ///     .build();
    ///
    /// let mut seen = Vec::new();
    /// let result = poller.run(|attempt| {
    ///     seen.push(attempt);
    ///     Ok::<_, ()>(attempt * 10)
    /// });
    ///
    /// assert_eq!(result, Ok(30));
    /// assert_eq!(seen, vec![1, 2, 3]);
    /// ```
    pub fn run<F>(&self, mut operation: F) -> Result<T, PollError<E>>
    where
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut session = Session::start(self);
        loop {
            let attempt = session.begin_attempt()?;
            let outcome = session.classify(operation(attempt));
            match session.settle(outcome) {
                Step::Done(result) => return result,
                Step::Wait(delay) => self.clock.sleep(delay),
            }
        }
    }

    /// Poll an async `operation`, awaiting [`Clock::sleep_async`] between attempts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use poller_bear::{PollOptions, Poller};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let poller = PollOptions::new()
    ///     .with_interval(Duration::from_millis(1))
    ///     .stop_when(|value: &u32, _| *value > 1)
    ///     .build();
    ///
    /// let result = poller
    ///     .run_async(|attempt| async move { Ok::<_, ()>(attempt) })
    ///     .await;
    /// assert_eq!(result, Ok(2));
    /// # });
    /// ```
    #[cfg(feature = "async")]
    pub async fn run_async<F, Fut>(&self, mut operation: F) -> Result<T, PollError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let mut session = Session::start(self);
        loop {
            let attempt = session.begin_attempt()?;
            let outcome = session.classify(operation(attempt).await);
            match session.settle(outcome) {
                Step::Done(result) => return result,
                Step::Wait(delay) => self.clock.sleep_async(delay).await,
            }
        }
    }
}

impl<T, E> fmt::Debug for Poller<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poller")
            .field("interval", &self.interval)
            .field("jitter", &self.jitter)
            .field("deadline", &self.deadline)
            .field("max_retries", &self.max_retries)
            .field("stop_when", &self.stop_when.as_ref().map(|_| "<fn>"))
            .field("retry_on", &self.retry_on)
            .finish_non_exhaustive()
    }
}
