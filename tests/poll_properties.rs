//! Property-based tests for the poll loop, run on virtual time.

use proptest::prelude::*;
use std::time::Duration;

use poller_bear::testing::{ManualClock, RecordingSink};
use poller_bear::{Interval, PollError, PollOptions, RetryOn};

#[derive(Debug, Clone, PartialEq)]
enum TestError {
    Transient,
    Permanent,
}

fn options<T>(clock: &ManualClock, interval: Interval) -> PollOptions<T, TestError> {
    PollOptions::new()
        .with_interval(interval)
        .with_clock(clock.clone())
        .with_diagnostics(RecordingSink::new())
}

proptest! {
    #[test]
    fn prop_returns_first_accepted_result(accept_at in 1u32..50) {
        let clock = ManualClock::new();
        let poller = options(&clock, Interval::fixed(Duration::from_millis(1)))
            .stop_when(move |value: &u32, _| *value == accept_at * 3)
            .build();

        let mut calls = 0u32;
        let result = poller.run(|attempt| {
            calls += 1;
            Ok(attempt * 3)
        });

        prop_assert_eq!(result, Ok(accept_at * 3));
        prop_assert_eq!(calls, accept_at);
    }

    #[test]
    fn prop_max_retries_bounds_invocations(max in 1u32..50) {
        let clock = ManualClock::new();
        let poller = options(&clock, Interval::fixed(Duration::from_millis(1)))
            .with_max_retries(max)
            .stop_when(|_: &(), _| false)
            .build();

        let mut attempts = Vec::new();
        let result = poller.run(|attempt| {
            attempts.push(attempt);
            Ok(())
        });

        let is_exhausted = matches!(result, Err(PollError::RetriesExhausted { .. }));
        prop_assert!(is_exhausted);
        prop_assert_eq!(attempts, (1..=max).collect::<Vec<_>>());
        prop_assert_eq!(clock.sleeps().len() as u32, max);
    }

    #[test]
    fn prop_timeout_attempt_count_is_deterministic(
        interval_ms in 1u64..50,
        timeout_ms in 0u64..500,
    ) {
        let clock = ManualClock::new();
        let poller = options(&clock, Interval::fixed(Duration::from_millis(interval_ms)))
            .with_timeout(Duration::from_millis(timeout_ms))
            .stop_when(|_: &(), _| false)
            .build();

        let mut attempts = Vec::new();
        let result = poller.run(|attempt| {
            attempts.push(attempt);
            Ok(())
        });

        // Attempt k starts at (k - 1) * interval and runs while that is before the deadline.
        let expected = timeout_ms.div_ceil(interval_ms) as u32;
        prop_assert!(result.unwrap_err().is_timeout());
        prop_assert_eq!(attempts, (1..=expected).collect::<Vec<_>>());
    }

    #[test]
    fn prop_exponential_waits_double(base_ms in 1u64..1_000, attempts in 2u32..10) {
        let clock = ManualClock::new();
        let poller = options(
            &clock,
            Interval::exponential_from(Duration::from_millis(base_ms)),
        )
        .with_max_retries(attempts)
        .stop_when(|_: &(), _| false)
        .build();

        let _ = poller.run(|_| Ok(()));

        let sleeps = clock.sleeps();
        prop_assert_eq!(sleeps[0], Duration::from_millis(base_ms));
        for pair in sleeps.windows(2) {
            prop_assert_eq!(pair[1], pair[0] * 2);
        }
    }

    #[test]
    fn prop_custom_interval_used_verbatim(offset_ms in 0u64..100, accept_at in 2u32..20) {
        let clock = ManualClock::new();
        let poller = options(
            &clock,
            Interval::custom(move |attempt| Duration::from_millis(offset_ms + attempt as u64)),
        )
        .stop_when(move |_: &(), attempt| attempt == accept_at)
        .build();

        let _ = poller.run(|_| Ok(()));

        let expected: Vec<_> = (1..accept_at)
            .map(|n| Duration::from_millis(offset_ms + n as u64))
            .collect();
        prop_assert_eq!(clock.sleeps(), expected);
    }

    #[test]
    fn prop_listed_errors_are_absorbed(failures in 0u32..20) {
        let clock = ManualClock::new();
        let poller = options(&clock, Interval::fixed(Duration::from_millis(1)))
            .with_retry_on(RetryOn::kinds([&TestError::Transient]))
            .build();

        let mut calls = 0u32;
        let result = poller.run(|attempt| {
            calls += 1;
            if attempt <= failures {
                Err(TestError::Transient)
            } else {
                Ok(attempt)
            }
        });

        prop_assert_eq!(result, Ok(failures + 1));
        prop_assert_eq!(calls, failures + 1);
    }

    #[test]
    fn prop_unlisted_error_freezes_attempts(fatal_at in 1u32..20) {
        let clock = ManualClock::new();
        let poller = options(&clock, Interval::fixed(Duration::from_millis(1)))
            .with_max_retries(50)
            .with_retry_on(RetryOn::kinds([&TestError::Transient]))
            .stop_when(|_: &(), _| false)
            .build();

        let mut attempts = Vec::new();
        let result = poller.run(|attempt| {
            attempts.push(attempt);
            if attempt == fatal_at {
                Err(TestError::Permanent)
            } else {
                Err(TestError::Transient)
            }
        });

        prop_assert_eq!(result, Err(PollError::Operation(TestError::Permanent)));
        prop_assert_eq!(attempts.len() as u32, fatal_at);
        prop_assert_eq!(clock.sleeps().len() as u32, fatal_at - 1);
    }
}
