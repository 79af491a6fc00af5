//! Error types for methodcall.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`MethodCallError`] - Top-level error reported through a continuation
//! - [`CoercionError`] - Rendered text that does not fit the declared type
//! - [`ConfigError`] - Invalid target configuration
//! - [`FatalError`] - Failures a backend raises to mark them process-fatal
//! - [`Unrecoverable`] - A fatal failure handed back to the caller

use crate::value::ParameterType;
use std::{fmt, sync::Arc};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error value a continuation receives.
///
/// Shared so that the outcome of one grouped invocation can be reported to
/// every event that took part in it.
pub type ReportedError = Arc<MethodCallError>;

/// Top-level error for a single method call attempt.
#[derive(Error, Debug)]
pub enum MethodCallError {
    /// A parameter could not be converted to its declared type.
    #[error("parameter {index} could not be prepared: {source}")]
    Coercion {
        /// Position of the parameter in the argument array.
        index: usize,
        /// The underlying conversion failure.
        #[source]
        source: CoercionError,
    },

    /// The invocation backend failed with a recoverable error.
    #[error("invocation failed: {0}")]
    Invocation(#[source] BoxError),

    /// The continuation was dropped before anyone completed it.
    #[error("continuation was dropped before completion")]
    Abandoned,
}

impl MethodCallError {
    /// Returns `true` if the attempt failed before the backend was called.
    pub fn is_prepare_failure(&self) -> bool {
        matches!(self, MethodCallError::Coercion { .. })
    }
}

/// Rendered text could not be converted to the declared parameter type.
#[derive(Error, Debug)]
#[error("cannot convert {text:?} to {target}")]
pub struct CoercionError {
    text: String,
    target: ParameterType,
    #[source]
    source: Option<BoxError>,
}

impl CoercionError {
    pub(crate) fn new(text: &str, target: ParameterType, source: Option<BoxError>) -> Self {
        Self {
            text: text.to_owned(),
            target,
            source,
        }
    }

    /// The text that failed to convert.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The type the text was supposed to convert into.
    pub fn target(&self) -> ParameterType {
        self.target
    }
}

/// Errors raised while assembling a target.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No method is registered under the requested name.
    #[error("no method registered under name: {0}")]
    MethodNotFound(String),

    /// A method is registered twice under the same name.
    #[error("method already registered under name: {0}")]
    AlreadyExists(String),

    /// The configured parameters do not match the method's arity.
    #[error("method `{method}` expects {expected} arguments but {actual} parameters are configured")]
    ArityMismatch {
        /// Name of the resolved method.
        method: String,
        /// Number of arguments the method takes.
        expected: usize,
        /// Number of configured parameters.
        actual: usize,
    },

    /// Any other invalid setting.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Categories of failure that must never be reported as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalKind {
    /// Memory could not be allocated.
    OutOfMemory,
    /// The call stack was exhausted.
    StackExhaustion,
    /// The executing thread or task was torn down.
    Aborted,
    /// Process state can no longer be trusted.
    Corrupted,
}

impl fmt::Display for FatalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FatalKind::OutOfMemory => "out of memory",
            FatalKind::StackExhaustion => "stack exhaustion",
            FatalKind::Aborted => "aborted",
            FatalKind::Corrupted => "corrupted state",
        };
        f.write_str(name)
    }
}

/// A failure raised by a backend that must propagate to the caller.
///
/// Backends return this (directly or as the source of their own error) to
/// opt out of continuation reporting.
#[derive(Error, Debug)]
#[error("fatal failure ({kind}): {message}")]
pub struct FatalError {
    kind: FatalKind,
    message: String,
}

impl FatalError {
    /// Create a new fatal error.
    pub fn new(kind: FatalKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> FatalKind {
        self.kind
    }
}

/// A failure classified as fatal, returned to the caller instead of being
/// passed to the continuation.
#[derive(Error, Debug)]
#[error("unrecoverable failure during method call: {0}")]
pub struct Unrecoverable(#[source] BoxError);

impl Unrecoverable {
    /// Wrap a fatal failure.
    pub fn new(err: BoxError) -> Self {
        Self(err)
    }

    /// Borrow the original failure.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Take the original failure.
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}
