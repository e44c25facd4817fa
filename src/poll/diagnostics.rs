//! Configuration-time warnings.

/// Warning emitted when a poller has neither a timeout nor a stop predicate.
pub const UNBOUNDED_POLL_WARNING: &str = "[PollerBear] Warning: Polling with no time limit and no stop condition will lead to infinite loops.";

/// Receiver for warnings raised while a [`Poller`](crate::Poller) is built.
///
/// Any `Fn(&str)` closure is a sink:
///
/// ```rust
/// use poller_bear::{PollOptions, Poller};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = {
///     let seen = seen.clone();
///     move |msg: &str| seen.lock().unwrap().push(msg.to_string())
/// };
///
/// let _poller: Poller<(), ()> = Poller::new(PollOptions::new().with_diagnostics(sink));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub trait DiagnosticSink: Send + Sync {
    /// Report a human-readable warning.
    fn warn(&self, message: &str);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Default sink: `tracing::warn!` with the `tracing` feature, stderr otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{}", message);
        #[cfg(not(feature = "tracing"))]
        eprintln!("{}", message);
    }
}
