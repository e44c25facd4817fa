//! Backoff interval types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base delay of [`Interval::exponential`]: 0.5s, 1s, 2s, 4s, ...
pub const DEFAULT_EXPONENTIAL_BASE: Duration = Duration::from_millis(500);

/// Default fixed interval between attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait between two attempts.
///
/// The interval is evaluated fresh before every wait, keyed on the attempt
/// that just finished (1-indexed).
///
/// # Examples
///
/// ```rust
/// use poller_bear::Interval;
/// use std::time::Duration;
///
/// let fixed = Interval::fixed(Duration::from_millis(10));
/// assert_eq!(fixed.delay_for_attempt(1), Duration::from_millis(10));
/// assert_eq!(fixed.delay_for_attempt(7), Duration::from_millis(10));
///
/// let exp = Interval::exponential();
/// assert_eq!(exp.delay_for_attempt(1), Duration::from_millis(500));
/// assert_eq!(exp.delay_for_attempt(2), Duration::from_secs(1));
/// assert_eq!(exp.delay_for_attempt(3), Duration::from_secs(2));
///
/// let custom = Interval::custom(|attempt| Duration::from_millis(attempt as u64 * 5));
/// assert_eq!(custom.delay_for_attempt(4), Duration::from_millis(20));
/// ```
#[derive(Clone)]
pub enum Interval {
    /// The same delay after every attempt.
    Fixed(Duration),
    /// Delay doubles each attempt: base * 2^(attempt - 1).
    Exponential {
        /// Delay after the first attempt.
        base: Duration,
    },
    /// Caller-computed delay for a given attempt number.
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Interval {
    /// Wait `delay` after every attempt.
    pub fn fixed(delay: Duration) -> Self {
        Interval::Fixed(delay)
    }

    /// Binary exponential backoff starting at 500ms.
    pub fn exponential() -> Self {
        Interval::Exponential {
            base: DEFAULT_EXPONENTIAL_BASE,
        }
    }

    /// Binary exponential backoff starting at `base`.
    pub fn exponential_from(base: Duration) -> Self {
        Interval::Exponential { base }
    }

    /// Compute the delay with `f`, called with the attempt number.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Interval::Custom(Arc::new(f))
    }

    /// Delay to wait after `attempt` (1-indexed) before the next one.
    ///
    /// Exponential delays saturate at `Duration::MAX` rather than overflow.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Interval::Fixed(d) => *d,
            Interval::Exponential { base } => {
                let exponent = attempt.saturating_sub(1);
                base.saturating_mul(2u32.saturating_pow(exponent))
            }
            Interval::Custom(f) => f(attempt),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Fixed(DEFAULT_INTERVAL)
    }
}

impl From<Duration> for Interval {
    fn from(delay: Duration) -> Self {
        Interval::Fixed(delay)
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Interval::Exponential { base } => {
                f.debug_struct("Exponential").field("base", base).finish()
            }
            Interval::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Randomness added on top of the computed interval.
///
/// **Note**: Requires the `jitter` feature. Without it, every strategy
/// returns the interval unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Jitter {
    /// No jitter applied.
    #[default]
    None,
    /// Add ±percentage randomness to the delay.
    Proportional(f64),
    /// Random delay between 0 and the computed delay.
    Full,
}

impl Jitter {
    /// Proportional jitter, with `factor` clamped to `0.0..=1.0`.
    ///
    /// A NaN factor becomes `0.0`.
    pub fn proportional(factor: f64) -> Self {
        if factor.is_nan() {
            Jitter::Proportional(0.0)
        } else {
            Jitter::Proportional(factor.clamp(0.0, 1.0))
        }
    }

    /// Apply jitter to a computed delay.
    ///
    /// A `Proportional` factor that is not finite leaves the delay unchanged.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            #[cfg(feature = "jitter")]
            Jitter::Proportional(factor) => {
                use rand::Rng;
                if !factor.is_finite() {
                    return delay;
                }
                let secs = delay.as_secs_f64();
                let spread = secs * factor.abs();
                let low = (secs - spread).max(0.0);
                let high = secs + spread;
                if high > low {
                    let jittered = rand::rng().random_range(low..=high);
                    Duration::try_from_secs_f64(jittered).unwrap_or(delay)
                } else {
                    delay
                }
            }
            #[cfg(not(feature = "jitter"))]
            Jitter::Proportional(_) => delay,
            #[cfg(feature = "jitter")]
            Jitter::Full => {
                use rand::Rng;
                let max_nanos = delay.as_nanos().min(u64::MAX as u128) as u64;
                if max_nanos == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_nanos(rand::rng().random_range(0..=max_nanos))
                }
            }
            #[cfg(not(feature = "jitter"))]
            Jitter::Full => delay,
        }
    }
}

#[cfg(test)]
mod interval_tests {
    use super::*;

    #[test]
    fn test_default_is_one_second_fixed() {
        let interval = Interval::default();
        assert_eq!(interval.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(interval.delay_for_attempt(50), Duration::from_secs(1));
    }

    #[test]
    fn test_exponential_doubles_from_half_second() {
        let interval = Interval::exponential();
        let delays: Vec<_> = (1..=5).map(|n| interval.delay_for_attempt(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
    }

    #[test]
    fn test_exponential_with_custom_base() {
        let interval = Interval::exponential_from(Duration::from_millis(10));
        assert_eq!(interval.delay_for_attempt(1), Duration::from_millis(10));
        assert_eq!(interval.delay_for_attempt(4), Duration::from_millis(80));
    }

    #[test]
    fn test_exponential_saturates() {
        let interval = Interval::exponential();
        assert_eq!(interval.delay_for_attempt(u32::MAX), Duration::MAX);
    }

    #[test]
    fn test_custom_receives_attempt_number() {
        let interval = Interval::custom(|attempt| Duration::from_secs(attempt as u64));
        assert_eq!(interval.delay_for_attempt(3), Duration::from_secs(3));
    }

    #[test]
    fn test_from_duration() {
        let interval: Interval = Duration::from_millis(25).into();
        assert!(matches!(interval, Interval::Fixed(d) if d == Duration::from_millis(25)));
    }

    #[test]
    fn test_debug_hides_closure() {
        let debug = format!("{:?}", Interval::custom(|_| Duration::ZERO));
        assert_eq!(debug, "Custom(<fn>)");
    }

    #[test]
    fn test_jitter_none_returns_delay() {
        let delay = Duration::from_millis(100);
        assert_eq!(Jitter::None.apply(delay), delay);
    }

    #[test]
    fn test_jitter_proportional_clamps_factor() {
        assert_eq!(Jitter::proportional(4.0), Jitter::Proportional(1.0));
        assert_eq!(Jitter::proportional(-1.0), Jitter::Proportional(0.0));
        assert_eq!(Jitter::proportional(f64::NAN), Jitter::Proportional(0.0));
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_ignores_non_finite_factor() {
        let delay = Duration::from_millis(100);
        assert_eq!(Jitter::Proportional(f64::NAN).apply(delay), delay);
        assert_eq!(Jitter::Proportional(f64::INFINITY).apply(delay), delay);
        assert_eq!(Jitter::proportional(f64::NAN).apply(delay), delay);
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_unclamped_factor_stays_bounded() {
        let delay = Duration::from_millis(100);
        for _ in 0..100 {
            let wide = Jitter::Proportional(3.0).apply(delay);
            assert!(wide <= Duration::from_micros(400_001));

            let negative = Jitter::Proportional(-0.5).apply(delay);
            assert!(negative >= Duration::from_micros(49_999));
            assert!(negative <= Duration::from_micros(150_001));
        }
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_keeps_sub_millisecond_delays() {
        let delay = Duration::from_micros(900);
        let nonzero = (0..100)
            .map(|_| Jitter::Full.apply(delay))
            .filter(|d| *d > Duration::ZERO)
            .count();
        assert!(nonzero > 0);

        for _ in 0..100 {
            let proportional = Jitter::proportional(0.1).apply(delay);
            assert!(proportional >= Duration::from_micros(809));
            assert!(proportional <= Duration::from_micros(991));
        }
    }

    #[cfg(feature = "jitter")]
    #[test]
    fn test_jitter_stays_in_range() {
        let delay = Duration::from_millis(100);
        for _ in 0..100 {
            let proportional = Jitter::proportional(0.25).apply(delay);
            assert!(proportional >= Duration::from_micros(74_999));
            assert!(proportional <= Duration::from_micros(125_001));

            assert!(Jitter::Full.apply(delay) <= delay);
        }
    }

    #[cfg(not(feature = "jitter"))]
    #[test]
    fn test_jitter_is_noop_without_feature() {
        let delay = Duration::from_millis(100);
        assert_eq!(Jitter::Full.apply(delay), delay);
        assert_eq!(Jitter::proportional(0.5).apply(delay), delay);
    }
}
