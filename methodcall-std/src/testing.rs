//! Testing utilities for methodcall.
//!
//! This module provides doubles for exercising targets without a real
//! backend.
//!
//! # Features
//!
//! - [`RecordingInvoker`]: An invoker that records every argument array
//! - [`FailingInvoker`]: An invoker that always fails, recoverably or fatally
//! - [`RecordingContinuation`]: Collects the outcomes continuations report

use methodcall_core::{
    BoxError, Continuation, FatalError, FatalKind, Invoker, ParameterValue, ReportedError,
};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Invoker
// ============================================================================

/// An invoker that records every argument array it receives.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingInvoker::new();
/// let target = TargetBuilder::new(recorder.clone())
///     .parameter(Parameter::new(TemplateLayout::parse("${message}")?))
///     .build()?;
///
/// target.write_event(&event, Continuation::noop())?;
/// assert_eq!(recorder.calls(), vec![vec![ParameterValue::from("hello")]]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingInvoker {
    calls: Arc<Mutex<Vec<Vec<ParameterValue>>>>,
}

impl RecordingInvoker {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded argument arrays, in call order.
    pub fn calls(&self) -> Vec<Vec<ParameterValue>> {
        self.calls.lock().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Invoker for RecordingInvoker {
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        self.calls.lock().push(arguments);
        Ok(())
    }
}

// ============================================================================
// Failing Invoker
// ============================================================================

/// An invoker that fails every call.
///
/// # Example
///
/// ```rust,ignore
/// let backend = FailingInvoker::recoverable("connection refused");
/// let fatal = FailingInvoker::fatal(FatalKind::OutOfMemory);
/// ```
#[derive(Clone)]
pub struct FailingInvoker {
    message: String,
    fatal: Option<FatalKind>,
    attempts: Arc<AtomicUsize>,
}

impl FailingInvoker {
    /// Fail with an ordinary error carrying `message`.
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: None,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail with a [`FatalError`] of `kind`.
    pub fn fatal(kind: FatalKind) -> Self {
        Self {
            message: "simulated fatal failure".to_owned(),
            fatal: Some(kind),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of calls attempted so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Invoker for FailingInvoker {
    fn invoke(&self, _arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.fatal {
            Some(kind) => Err(FatalError::new(kind, self.message.clone()).into()),
            None => Err(self.message.clone().into()),
        }
    }
}

// ============================================================================
// Recording Continuation
// ============================================================================

/// Hands out continuations and collects what they report.
///
/// # Example
///
/// ```rust,ignore
/// let outcomes = RecordingContinuation::new();
/// target.write_event(&event, outcomes.continuation())?;
///
/// assert_eq!(outcomes.count(), 1);
/// assert!(outcomes.all_succeeded());
/// ```
#[derive(Clone, Default)]
pub struct RecordingContinuation {
    outcomes: Arc<Mutex<Vec<Option<ReportedError>>>>,
}

impl RecordingContinuation {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new continuation reporting into this recorder.
    pub fn continuation(&self) -> Continuation {
        let outcomes = self.outcomes.clone();
        Continuation::new(move |error| outcomes.lock().push(error))
    }

    /// Get a clone of the recorded outcomes, in completion order.
    pub fn outcomes(&self) -> Vec<Option<ReportedError>> {
        self.outcomes.lock().clone()
    }

    /// Number of completions observed.
    pub fn count(&self) -> usize {
        self.outcomes.lock().len()
    }

    /// Error messages of the failed completions.
    pub fn errors(&self) -> Vec<String> {
        self.outcomes
            .lock()
            .iter()
            .flatten()
            .map(|error| error.to_string())
            .collect()
    }

    /// Returns `true` if every observed completion was a success.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.lock().iter().all(Option::is_none)
    }
}
