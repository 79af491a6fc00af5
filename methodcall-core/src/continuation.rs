//! # Continuation
//!
//! A single-use completion callback carrying the outcome of one invocation
//! attempt. Completing consumes the continuation, so it can never fire twice.
//!
//! A continuation that is dropped without being completed is a bug in the
//! caller; with the `tracing` feature enabled it is logged at `warn`.

use crate::error::{MethodCallError, ReportedError};
use std::{fmt, sync::Arc};

type Callback = Box<dyn FnOnce(Option<ReportedError>) + Send + 'static>;

/// Completion callback for a single invocation attempt.
///
/// # Example
///
/// ```rust,ignore
/// let continuation = Continuation::new(|error| match error {
///     None => println!("delivered"),
///     Some(e) => eprintln!("failed: {e}"),
/// });
/// continuation.succeed();
/// ```
pub struct Continuation {
    callback: Option<Callback>,
}

impl Continuation {
    /// Create a continuation from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Option<ReportedError>) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A continuation that ignores the outcome.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Combine several continuations into one that reports the same outcome
    /// to each of them, in order.
    pub fn fan_out(continuations: Vec<Continuation>) -> Self {
        Self::new(move |error| {
            for continuation in continuations {
                continuation.complete(error.clone());
            }
        })
    }

    /// Report the outcome: `None` for success, `Some` for failure.
    pub fn complete(mut self, error: Option<ReportedError>) {
        if let Some(callback) = self.callback.take() {
            callback(error);
        }
    }

    /// Report success.
    pub fn succeed(self) {
        self.complete(None);
    }

    /// Report a failure.
    pub fn fail(self, error: MethodCallError) {
        self.complete(Some(Arc::new(error)));
    }
}

impl Drop for Continuation {
    fn drop(&mut self) {
        if self.callback.is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!("continuation dropped without being completed");
        }
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
