//! Classification of operation errors into retryable and fatal.

use std::fmt;
use std::mem::{discriminant, Discriminant};
use std::sync::Arc;

/// Which operation errors the poll loop absorbs and retries.
///
/// Errors that are not retryable propagate to the caller unchanged as
/// [`PollError::Operation`](crate::PollError::Operation).
///
/// # Examples
///
/// ```rust
/// use poller_bear::RetryOn;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Busy,
///     NotFound(String),
/// }
///
/// let policy = RetryOn::kinds([&FetchError::Busy]);
/// assert!(policy.should_retry(&FetchError::Busy));
/// assert!(!policy.should_retry(&FetchError::NotFound("a".into())));
///
/// assert!(!RetryOn::<FetchError>::Never.should_retry(&FetchError::Busy));
/// assert!(RetryOn::<FetchError>::Always.should_retry(&FetchError::Busy));
/// ```
pub enum RetryOn<E> {
    /// Every error is fatal.
    Never,
    /// Every error is retried.
    Always,
    /// Retry errors whose enum variant is in the set.
    OnKinds(Vec<Discriminant<E>>),
    /// Retry errors for which the predicate returns true.
    When(Arc<dyn Fn(&E) -> bool + Send + Sync>),
}

impl<E> RetryOn<E> {
    /// Retry errors of the same variant as any of `samples`.
    ///
    /// Only the variant matters; field values of the samples are ignored.
    pub fn kinds<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        RetryOn::OnKinds(samples.into_iter().map(discriminant).collect())
    }

    /// Retry errors matching `predicate`.
    ///
    /// Useful for type-based matching on boxed errors, e.g.
    /// `RetryOn::when(|e: &Box<dyn Error + Send + Sync>| e.is::<io::Error>())`.
    pub fn when<P>(predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        RetryOn::When(Arc::new(predicate))
    }

    /// Returns true if `error` should be absorbed and retried.
    pub fn should_retry(&self, error: &E) -> bool {
        match self {
            RetryOn::Never => false,
            RetryOn::Always => true,
            RetryOn::OnKinds(kinds) => kinds.contains(&discriminant(error)),
            RetryOn::When(predicate) => predicate(error),
        }
    }
}

impl<E> Default for RetryOn<E> {
    fn default() -> Self {
        RetryOn::Never
    }
}

impl<E> From<bool> for RetryOn<E> {
    fn from(retry: bool) -> Self {
        if retry {
            RetryOn::Always
        } else {
            RetryOn::Never
        }
    }
}

impl<E> Clone for RetryOn<E> {
    fn clone(&self) -> Self {
        match self {
            RetryOn::Never => RetryOn::Never,
            RetryOn::Always => RetryOn::Always,
            RetryOn::OnKinds(kinds) => RetryOn::OnKinds(kinds.clone()),
            RetryOn::When(predicate) => RetryOn::When(Arc::clone(predicate)),
        }
    }
}

impl<E> fmt::Debug for RetryOn<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryOn::Never => f.write_str("Never"),
            RetryOn::Always => f.write_str("Always"),
            RetryOn::OnKinds(kinds) => f.debug_tuple("OnKinds").field(kinds).finish(),
            RetryOn::When(_) => f.write_str("When(<fn>)"),
        }
    }
}

#[cfg(test)]
mod retry_on_tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[derive(Debug)]
    #[allow(dead_code)]
    enum TestError {
        Transient(u32),
        Permanent,
        Other { code: i32 },
    }

    #[test]
    fn test_default_never_retries() {
        let policy = RetryOn::<TestError>::default();
        assert!(!policy.should_retry(&TestError::Transient(1)));
        assert!(!policy.should_retry(&TestError::Permanent));
    }

    #[test]
    fn test_always_retries_everything() {
        let policy = RetryOn::<TestError>::Always;
        assert!(policy.should_retry(&TestError::Permanent));
        assert!(policy.should_retry(&TestError::Other { code: 3 }));
    }

    #[test]
    fn test_kinds_ignore_field_values() {
        let policy = RetryOn::kinds([&TestError::Transient(0), &TestError::Other { code: 0 }]);
        assert!(policy.should_retry(&TestError::Transient(99)));
        assert!(policy.should_retry(&TestError::Other { code: -1 }));
        assert!(!policy.should_retry(&TestError::Permanent));
    }

    #[test]
    fn test_empty_kinds_never_retry() {
        let policy = RetryOn::<TestError>::OnKinds(Vec::new());
        assert!(!policy.should_retry(&TestError::Transient(1)));
    }

    #[test]
    fn test_when_matches_boxed_error_type() {
        let policy: RetryOn<Box<dyn Error + Send + Sync>> =
            RetryOn::when(|e: &Box<dyn Error + Send + Sync>| e.is::<io::Error>());

        let io_err: Box<dyn Error + Send + Sync> =
            Box::new(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        let other: Box<dyn Error + Send + Sync> = "plain".into();

        assert!(policy.should_retry(&io_err));
        assert!(!policy.should_retry(&other));
    }

    #[test]
    fn test_from_bool() {
        assert!(RetryOn::<TestError>::from(true).should_retry(&TestError::Permanent));
        assert!(!RetryOn::<TestError>::from(false).should_retry(&TestError::Permanent));
    }

    #[test]
    fn test_clone_and_debug() {
        let policy = RetryOn::kinds([&TestError::Permanent]);
        let cloned = policy.clone();
        assert!(cloned.should_retry(&TestError::Permanent));
        assert!(format!("{:?}", cloned).starts_with("OnKinds"));
        assert_eq!(
            format!("{:?}", RetryOn::<TestError>::when(|_| true)),
            "When(<fn>)"
        );
    }
}
