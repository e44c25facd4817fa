//! Declarative poll configuration.
//!
//! `PollConfig` holds the data-only part of [`PollOptions`]: everything except
//! the stop predicate, the clock and the diagnostic sink. Seconds are plain
//! numbers so the config can sit in JSON or TOML next to other settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use super::poller::PollOptions;
use super::retry_on::RetryOn;

/// Named interval strategies accepted by [`Every`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalStrategy {
    /// Binary exponential backoff from 0.5 seconds.
    Exponential,
}

/// The `every` setting: seconds between attempts, or a named strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Every {
    /// Fixed interval in seconds.
    Seconds(f64),
    /// A named strategy such as `"exponential"`.
    Strategy(IntervalStrategy),
}

impl Default for Every {
    fn default() -> Self {
        Every::Seconds(1.0)
    }
}

/// Serializable poll options.
///
/// # Examples
///
/// ```rust
/// use poller_bear::{PollConfig, Poller};
/// use std::time::Duration;
///
/// let config: PollConfig = serde_json::from_str(
///     r#"{ "every": "exponential", "for": 30, "max_retries": 5 }"#,
/// ).unwrap();
///
/// let poller: Poller<u32, String> = config
///     .into_options()
///     .unwrap()
///     .stop_when(|v: &u32, _| *v > 0)
///     .build();
/// assert_eq!(poller.interval().delay_for_attempt(2), Duration::from_secs(1));
/// assert_eq!(poller.max_retries(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Interval between attempts.
    pub every: Every,
    /// Total seconds before timing out.
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub within: Option<f64>,
    /// Maximum number of attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// Retry on every operation error instead of propagating it.
    pub retry_on_exceptions: bool,
}

impl PollConfig {
    /// Validate the config and turn it into builder options.
    pub fn into_options<T, E>(self) -> Result<PollOptions<T, E>, ConfigError> {
        let interval = match self.every {
            Every::Seconds(secs) => Interval::Fixed(seconds("every", secs)?),
            Every::Strategy(IntervalStrategy::Exponential) => Interval::exponential(),
        };

        let mut options = PollOptions::new()
            .with_interval(interval)
            .with_retry_on(RetryOn::from(self.retry_on_exceptions));

        if let Some(secs) = self.within {
            options = options.with_timeout(seconds("for", secs)?);
        }
        if let Some(n) = self.max_retries {
            if n == 0 {
                return Err(ConfigError::ZeroMaxRetries);
            }
            options = options.with_max_retries(n);
        }

        Ok(options)
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidSeconds { field, value })
}

/// A [`PollConfig`] value that cannot be turned into options.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A seconds value was negative, not finite, or too large.
    InvalidSeconds {
        /// The config field holding the value.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `max_retries` was zero.
    ZeroMaxRetries,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSeconds { field, value } => {
                write!(f, "invalid number of seconds for `{}`: {}", field, value)
            }
            Self::ZeroMaxRetries => write!(f, "`max_retries` must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}
