//! # Invocation Backend (Invoker)
//!
//! The capability a concrete target supplies: take a prepared argument array
//! and perform the call.
//!
//! Backends implement [`Invoker::invoke`]. The default
//! [`Invoker::invoke_with_continuation`] turns its result into a reported
//! outcome. Asynchronous backends override it, keep the continuation and
//! complete it once their call resolves.
//!
//! # Failure classification
//!
//! A [`FailureClassifier`] decides which failures are fatal. Fatal failures
//! are handed back to the caller as [`Unrecoverable`] and never reach the
//! continuation. [`DefaultClassifier`] treats an error as fatal when its
//! source chain contains:
//!
//! - a [`FatalError`]
//! - a [`std::collections::TryReserveError`] (allocation failure)
//! - an [`std::io::Error`] of kind [`std::io::ErrorKind::OutOfMemory`]
//!
//! Panics are never caught. A backend that panics unwinds straight through
//! the driver, and the continuation is not called.

use crate::{
    continuation::Continuation,
    error::{BoxError, ConfigError, FatalError, MethodCallError, Unrecoverable},
    value::ParameterValue,
};
use std::{collections::TryReserveError, error::Error, sync::Arc};

/// Performs the actual method call for a prepared argument array.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Invoker`",
    label = "missing `Invoker` implementation",
    note = "Invokers must implement `invoke(Vec<ParameterValue>)`."
)]
pub trait Invoker: Send + Sync {
    /// Call the method with `arguments`, positional.
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError>;

    /// Call the method and report the outcome through `continuation`.
    ///
    /// Returns `Err` only for failures `classifier` deems fatal, in which case
    /// the continuation has not been called. Backends that complete later
    /// keep a clone of `classifier` and classify with it then.
    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        let result = self.invoke(arguments);
        complete(classifier.as_ref(), result, continuation)
    }

    /// Check at configuration time that this backend accepts
    /// `parameter_count` positional arguments.
    fn validate(&self, parameter_count: usize) -> Result<(), ConfigError> {
        let _ = parameter_count;
        Ok(())
    }
}

impl<I: Invoker + ?Sized> Invoker for Box<I> {
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        (**self).invoke(arguments)
    }

    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        (**self).invoke_with_continuation(arguments, continuation, classifier)
    }

    fn validate(&self, parameter_count: usize) -> Result<(), ConfigError> {
        (**self).validate(parameter_count)
    }
}

impl<I: Invoker + ?Sized> Invoker for Arc<I> {
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        (**self).invoke(arguments)
    }

    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        (**self).invoke_with_continuation(arguments, continuation, classifier)
    }

    fn validate(&self, parameter_count: usize) -> Result<(), ConfigError> {
        (**self).validate(parameter_count)
    }
}

/// Report the result of an invocation.
///
/// Success completes the continuation with no error. A failure is classified:
/// fatal failures are returned without touching the continuation, anything
/// else is reported to it as [`MethodCallError::Invocation`].
pub fn complete(
    classifier: &dyn FailureClassifier,
    result: Result<(), BoxError>,
    continuation: Continuation,
) -> Result<(), Unrecoverable> {
    match result {
        Ok(()) => {
            continuation.succeed();
            Ok(())
        }
        Err(err) if classifier.is_fatal(&*err) => {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %err, "unrecoverable failure during invocation");
            Err(Unrecoverable::new(err))
        }
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "invocation failed");
            continuation.fail(MethodCallError::Invocation(err));
            Ok(())
        }
    }
}

/// Decides whether a failure must propagate instead of being reported.
pub trait FailureClassifier: Send + Sync {
    /// Returns `true` if `error` is fatal.
    fn is_fatal(&self, error: &(dyn Error + 'static)) -> bool;
}

/// A classifier shared between a target and the backends completing its
/// calls.
pub type SharedClassifier = Arc<dyn FailureClassifier>;

/// The default fatal-vs-recoverable boundary. See the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl DefaultClassifier {
    /// The default classifier behind a [`SharedClassifier`].
    pub fn shared() -> SharedClassifier {
        Arc::new(DefaultClassifier)
    }
}

impl FailureClassifier for DefaultClassifier {
    fn is_fatal(&self, error: &(dyn Error + 'static)) -> bool {
        let mut current = Some(error);
        while let Some(err) = current {
            if err.is::<FatalError>() || err.is::<TryReserveError>() {
                return true;
            }
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::OutOfMemory {
                    return true;
                }
            }
            current = err.source();
        }
        false
    }
}

// Blanket impl for closures
impl<F> FailureClassifier for F
where
    F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync,
{
    fn is_fatal(&self, error: &(dyn Error + 'static)) -> bool {
        (self)(error)
    }
}
