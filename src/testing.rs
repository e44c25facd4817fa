//! Testing utilities for code that polls.
//!
//! Real pollers sleep. These helpers let tests drive the poll loop with
//! virtual time and inspect what it did.
//!
//! # Examples
//!
//! ## ManualClock
//!
//! ```rust
//! use poller_bear::testing::{ManualClock, RecordingSink};
//! use poller_bear::{PollOptions, Poller};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let poller = Poller::new(
//!     PollOptions::new()
//!         .with_interval(Duration::from_secs(60))
//!         .with_timeout(Duration::from_secs(600))
//!         .with_clock(clock.clone())
//!         .stop_when(|_: &(), attempt| attempt == 4),
//! );
//!
//! poller.run(|_| Ok::<_, String>(())).unwrap();
//!
//! // Three waits of a minute each, without actually waiting.
//! assert_eq!(clock.sleeps(), vec![Duration::from_secs(60); 3]);
//! assert_eq!(clock.elapsed(), Duration::from_secs(180));
//! ```
//!
//! ## RecordingSink
//!
//! ```rust
//! use poller_bear::testing::RecordingSink;
//! use poller_bear::{PollOptions, Poller, UNBOUNDED_POLL_WARNING};
//!
//! let sink = RecordingSink::new();
//! let _poller: Poller<(), ()> = PollOptions::new().with_diagnostics(sink.clone()).build();
//! assert_eq!(sink.messages(), vec![UNBOUNDED_POLL_WARNING.to_string()]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::poll::{Clock, DiagnosticSink};

/// A clock that only moves when told to.
///
/// `sleep` returns immediately after advancing virtual time by the
/// requested duration and recording it. Clones share the same time, so a
/// test can keep one handle while the poller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    origin: Instant,
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    /// Create a clock at virtual time zero.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move virtual time forward without recording a sleep.
    ///
    /// Use this inside an operation to simulate slow work.
    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.elapsed = state.elapsed.saturating_add(duration);
    }

    /// Virtual time passed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock().sleeps.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let state = self.lock();
        state.origin + state.elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.lock();
        state.elapsed = state.elapsed.saturating_add(duration);
        state.sleeps.push(duration);
    }

    #[cfg(feature = "async")]
    fn sleep_async(&self, duration: Duration) -> futures::future::BoxFuture<'static, ()> {
        self.sleep(duration);
        Box::pin(futures::future::ready(()))
    }
}

/// A diagnostic sink that keeps every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::poll::Interval {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Fixed and exponential intervals of up to ten seconds.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use crate::poll::Interval;
        prop_oneof![
            (0u64..10_000).prop_map(|ms| Interval::fixed(Duration::from_millis(ms))),
            (1u64..10_000).prop_map(|ms| Interval::exponential_from(Duration::from_millis(ms))),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn manual_clock_sleep_advances_and_records() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_millis(10));
        clock.sleep(Duration::from_millis(20));
        assert_eq!(clock.now() - start, Duration::from_millis(30));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn manual_clock_advance_is_not_a_sleep() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        clock.sleep(Duration::from_secs(1));
        assert_eq!(handle.elapsed(), Duration::from_secs(1));
        assert_eq!(handle.now(), clock.now());
    }

    #[test]
    fn recording_sink_collects_messages() {
        let sink = RecordingSink::new();
        sink.warn("first");
        sink.clone().warn("second");
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use crate::poll::Interval;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn interval_arbitrary_is_never_custom(interval in any::<Interval>()) {
                prop_assert!(!matches!(interval, Interval::Custom(_)));
            }
        }
    }
}
