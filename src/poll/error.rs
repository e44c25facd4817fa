//! Terminal errors of a poll session.

use std::fmt;
use std::time::Duration;

/// Why a poll session ended without an accepted result.
///
/// Timeouts and exhausted retries carry the last error the operation
/// returned (if any) as their `cause`. Fatal operation errors come back
/// unchanged in [`PollError::Operation`].
///
/// # Examples
///
/// ```rust
/// use poller_bear::{PollError, PollOptions, Poller};
/// use std::time::Duration;
///
/// let poller = Poller::new(
///     PollOptions::new()
///         .with_interval(Duration::from_millis(1))
///         .with_max_retries(2)
///         .stop_when(|_: &u32, _| false),
/// );
///
/// match poller.run(|_| Ok::<_, String>(0)) {
///     Err(PollError::RetriesExhausted { attempts, cause, .. }) => {
///         assert_eq!(attempts, 2);
///         assert!(cause.is_none());
///     }
///     other => panic!("Expected exhaustion, got {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollError<E> {
    /// A run was requested without an operation to poll.
    ///
    /// [`Poller::run`](crate::Poller::run) takes the operation by value and
    /// never returns this. Wrappers that look the operation up at run time
    /// report a missing one with it.
    InvalidInvocation {
        /// What was wrong with the invocation.
        reason: &'static str,
    },
    /// The deadline passed before an attempt could start.
    Timeout {
        /// Attempts made before the deadline check failed.
        attempts: u32,
        /// Time from the start of the run to the failed deadline check.
        elapsed: Duration,
        /// Last error returned by the operation, if any.
        cause: Option<E>,
    },
    /// The attempt cap was reached without an accepted result.
    RetriesExhausted {
        /// Attempts made; equal to the configured cap.
        attempts: u32,
        /// Total time spent, including the trailing wait.
        elapsed: Duration,
        /// Last error returned by the operation, if any.
        cause: Option<E>,
    },
    /// The operation returned an error the retry policy does not absorb.
    Operation(E),
}

impl<E> PollError<E> {
    /// Create a timeout error.
    pub fn timeout(attempts: u32, elapsed: Duration, cause: Option<E>) -> Self {
        Self::Timeout {
            attempts,
            elapsed,
            cause,
        }
    }

    /// Create a retries-exhausted error.
    pub fn retries_exhausted(attempts: u32, elapsed: Duration, cause: Option<E>) -> Self {
        Self::RetriesExhausted {
            attempts,
            elapsed,
            cause,
        }
    }

    /// Returns true if the deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if the attempt cap was reached.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// Returns true if this is a propagated operation error.
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// Number of attempts made, for timeouts and exhausted retries.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Timeout { attempts, .. } | Self::RetriesExhausted { attempts, .. } => {
                Some(*attempts)
            }
            Self::InvalidInvocation { .. } | Self::Operation(_) => None,
        }
    }

    /// The underlying operation error, if any.
    ///
    /// For timeouts and exhausted retries this is the chained cause; for
    /// [`PollError::Operation`] it is the propagated error itself.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::Timeout { cause, .. } | Self::RetriesExhausted { cause, .. } => cause.as_ref(),
            Self::Operation(e) => Some(e),
            Self::InvalidInvocation { .. } => None,
        }
    }

    /// Extract the underlying operation error, discarding metadata.
    pub fn into_cause(self) -> Option<E> {
        match self {
            Self::Timeout { cause, .. } | Self::RetriesExhausted { cause, .. } => cause,
            Self::Operation(e) => Some(e),
            Self::InvalidInvocation { .. } => None,
        }
    }

    /// Get the propagated operation error, if this is one.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInvocation { reason } => write!(f, "invalid poll invocation: {}", reason),
            Self::Timeout {
                attempts, elapsed, ..
            } => write!(
                f,
                "polling timed out after {} attempts ({:?})",
                attempts, elapsed
            ),
            Self::RetriesExhausted {
                attempts, elapsed, ..
            } => write!(
                f,
                "polled maximum number of retries: {} attempts ({:?})",
                attempts, elapsed
            ),
            Self::Operation(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for PollError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout { cause, .. } | Self::RetriesExhausted { cause, .. } => {
                cause.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
            }
            Self::Operation(e) => e.source(),
            Self::InvalidInvocation { .. } => None,
        }
    }
}
