//! # Invocation Driver
//!
//! Sequences one invocation attempt:
//!
//! 1. **Prepare**: render every parameter, in order, into an argument array.
//! 2. **Invoke**: hand the array to an [`Invoker`].
//! 3. **Complete**: report exactly one outcome to the continuation.
//!
//! Prepare always finishes before Invoke starts, and no partial argument
//! array ever reaches the backend.

use crate::{
    continuation::Continuation,
    error::{MethodCallError, Unrecoverable},
    event::AsyncLogEvent,
    invoker::{DefaultClassifier, FailureClassifier, Invoker, SharedClassifier},
    parameter::Parameter,
    render::ParameterRenderer,
    value::ParameterValue,
};
use std::{fmt, sync::Arc};

/// Prepares arguments from events and drives invocations.
pub struct InvocationDriver<E: ?Sized, C = DefaultClassifier> {
    parameters: Arc<[Parameter<E>]>,
    renderer: ParameterRenderer,
    classifier: Arc<C>,
}

impl<E: ?Sized> InvocationDriver<E, DefaultClassifier> {
    /// A driver over `parameters` with a fresh-buffer renderer and the
    /// default classifier.
    pub fn new(parameters: impl Into<Arc<[Parameter<E>]>>) -> Self {
        Self::with_parts(parameters, ParameterRenderer::new(), DefaultClassifier)
    }
}

impl<E: ?Sized, C: FailureClassifier + 'static> InvocationDriver<E, C> {
    /// A driver assembled from its parts.
    pub fn with_parts(
        parameters: impl Into<Arc<[Parameter<E>]>>,
        renderer: ParameterRenderer,
        classifier: C,
    ) -> Self {
        Self {
            parameters: parameters.into(),
            renderer,
            classifier: Arc::new(classifier),
        }
    }

    /// The configured parameters, in argument order.
    pub fn parameters(&self) -> &[Parameter<E>] {
        &self.parameters
    }

    /// The renderer used by Prepare.
    pub fn renderer(&self) -> &ParameterRenderer {
        &self.renderer
    }

    /// The failure classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Returns `true` if any parameter is grouped.
    pub fn has_grouped_parameters(&self) -> bool {
        self.parameters.iter().any(Parameter::is_grouped)
    }

    /// Prepare the full argument array for one event.
    ///
    /// Grouped parameters are rendered around this single event.
    pub fn prepare(&self, event: &E) -> Result<Vec<ParameterValue>, MethodCallError> {
        let mut arguments = Vec::with_capacity(self.parameters.len());
        for (index, parameter) in self.parameters.iter().enumerate() {
            let value = self
                .renderer
                .render_single(event, parameter, true)
                .map_err(|source| MethodCallError::Coercion { index, source })?;
            arguments.push(value.unwrap_or_else(|| ParameterValue::String(String::new())));
        }
        Ok(arguments)
    }

    /// Prepare the per-event shape of the argument array, leaving grouped
    /// slots unset.
    pub fn probe(&self, event: &E) -> Result<Vec<Option<ParameterValue>>, MethodCallError> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                self.renderer
                    .render_single(event, parameter, false)
                    .map_err(|source| MethodCallError::Coercion { index, source })
            })
            .collect()
    }

    /// Fill the grouped slots of a probed argument array by rendering each
    /// grouped parameter over `events`.
    pub fn fill_grouped<'e, I>(
        &self,
        probed: Vec<Option<ParameterValue>>,
        events: I,
    ) -> Vec<ParameterValue>
    where
        E: 'e,
        I: IntoIterator<Item = &'e E> + Clone,
        I::IntoIter: ExactSizeIterator,
    {
        probed
            .into_iter()
            .zip(self.parameters.iter())
            .map(|(slot, parameter)| match slot {
                Some(value) => value,
                None => ParameterValue::String(
                    self.renderer.render_group(events.clone(), parameter),
                ),
            })
            .collect()
    }

    /// Invoke with prepared arguments, reporting to a raw continuation.
    pub fn invoke<I>(
        &self,
        invoker: &I,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
    ) -> Result<(), Unrecoverable>
    where
        I: Invoker + ?Sized,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(arguments = arguments.len(), "invoking method");
        let classifier: SharedClassifier = self.classifier.clone();
        invoker.invoke_with_continuation(arguments, continuation, &classifier)
    }

    /// Invoke with prepared arguments, reporting to the continuation of a
    /// delivery context.
    pub fn invoke_event<I>(
        &self,
        invoker: &I,
        arguments: Vec<ParameterValue>,
        event: AsyncLogEvent<E>,
    ) -> Result<(), Unrecoverable>
    where
        E: Sized,
        I: Invoker + ?Sized,
    {
        let (_event, continuation) = event.into_parts();
        self.invoke(invoker, arguments, continuation)
    }

    /// Prepare and invoke for one event.
    ///
    /// A Prepare failure is classified like an invocation failure: unless it
    /// is fatal it goes to `continuation` and the backend is never called.
    pub fn execute<I>(
        &self,
        invoker: &I,
        event: &E,
        continuation: Continuation,
    ) -> Result<(), Unrecoverable>
    where
        I: Invoker + ?Sized,
    {
        match self.prepare(event) {
            Ok(arguments) => self.invoke(invoker, arguments, continuation),
            Err(err) => self.report(err, continuation),
        }
    }

    /// Returns `true` if the classifier deems `err` fatal.
    pub fn is_fatal(&self, err: &MethodCallError) -> bool {
        self.classifier.is_fatal(err)
    }

    /// Classify a failure and route it: fatal failures are returned, others
    /// are reported to `continuation`.
    pub fn report(
        &self,
        err: MethodCallError,
        continuation: Continuation,
    ) -> Result<(), Unrecoverable> {
        if self.is_fatal(&err) {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %err, "unrecoverable failure while preparing arguments");
            return Err(Unrecoverable::new(Box::new(err)));
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "failed to prepare arguments");
        continuation.fail(err);
        Ok(())
    }
}

impl<E: ?Sized, C: fmt::Debug> fmt::Debug for InvocationDriver<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationDriver")
            .field("parameters", &self.parameters)
            .field("renderer", &self.renderer)
            .field("classifier", &self.classifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{BoxError, FatalError, FatalKind, ReportedError},
        value::ParameterType,
    };
    use std::sync::Mutex;

    fn message(event: &String) -> String {
        event.clone()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<ParameterValue>>>,
        fail_with: Option<fn() -> BoxError>,
    }

    impl Invoker for Recorder {
        fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
            self.calls.lock().unwrap().push(arguments);
            match self.fail_with {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    fn timeout() -> BoxError {
        "timeout".into()
    }

    fn stack_exhausted() -> BoxError {
        FatalError::new(FatalKind::StackExhaustion, "deep").into()
    }

    type Outcomes = Arc<Mutex<Vec<Option<ReportedError>>>>;

    fn recording() -> (Continuation, Outcomes) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (
            Continuation::new(move |e| sink.lock().unwrap().push(e)),
            seen,
        )
    }

    #[test]
    fn test_hello_scenario() {
        let driver = InvocationDriver::new(vec![Parameter::new(message)]);
        let invoker = Recorder::default();
        let (continuation, seen) = recording();

        driver
            .execute(&invoker, &"hello".to_string(), continuation)
            .unwrap();

        assert_eq!(
            *invoker.calls.lock().unwrap(),
            vec![vec![ParameterValue::String("hello".into())]]
        );
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_none());
    }

    #[test]
    fn test_coercion_failure_skips_invocation() {
        let driver = InvocationDriver::new(vec![
            Parameter::new(message).with_type(ParameterType::I32),
        ]);
        let invoker = Recorder::default();
        let (continuation, seen) = recording();

        driver
            .execute(&invoker, &"not-a-number".to_string(), continuation)
            .unwrap();

        assert!(invoker.calls.lock().unwrap().is_empty());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(
            seen[0].as_deref(),
            Some(MethodCallError::Coercion { index: 0, .. })
        ));
    }

    #[test]
    fn test_prepare_reports_failing_index() {
        let driver = InvocationDriver::new(vec![
            Parameter::new(message),
            Parameter::new(|_: &String| "x".to_string()).with_type(ParameterType::Bool),
        ]);
        let err = driver.prepare(&"ok".to_string()).unwrap_err();
        assert!(matches!(err, MethodCallError::Coercion { index: 1, .. }));
    }

    #[test]
    fn test_prepare_keeps_descriptor_order() {
        let driver = InvocationDriver::new(vec![
            Parameter::new(|_: &String| "7".to_string()).with_type(ParameterType::U16),
            Parameter::new(message),
            Parameter::new(|_: &String| "true".to_string()).with_type(ParameterType::Bool),
        ]);
        let arguments = driver.prepare(&"m".to_string()).unwrap();
        assert_eq!(
            arguments,
            vec![
                ParameterValue::U16(7),
                ParameterValue::String("m".into()),
                ParameterValue::Bool(true),
            ]
        );
    }

    #[test]
    fn test_probe_and_fill_grouped() {
        let driver = InvocationDriver::new(vec![
            Parameter::new(|_: &String| "const".to_string()),
            Parameter::new(message)
                .grouped()
                .separator(|_: &String| ",".to_string()),
        ]);
        let probed = driver.probe(&"a".to_string()).unwrap();
        assert_eq!(
            probed,
            vec![Some(ParameterValue::String("const".into())), None]
        );

        let events = vec!["a".to_string(), "b".to_string()];
        let arguments = driver.fill_grouped(probed, &events);
        assert_eq!(
            arguments,
            vec![
                ParameterValue::String("const".into()),
                ParameterValue::String("a,b".into()),
            ]
        );
    }

    #[test]
    fn test_recoverable_invocation_failure_is_reported_once() {
        let driver = InvocationDriver::new(vec![Parameter::new(message)]);
        let invoker = Recorder {
            fail_with: Some(timeout),
            ..Default::default()
        };
        let (continuation, seen) = recording();

        assert!(
            driver
                .execute(&invoker, &"x".to_string(), continuation)
                .is_ok()
        );
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].as_ref().map(|e| e.to_string()),
            Some("invocation failed: timeout".to_string())
        );
    }

    #[test]
    fn test_fatal_invocation_failure_bypasses_continuation() {
        let driver = InvocationDriver::new(vec![Parameter::new(message)]);
        let invoker = Recorder {
            fail_with: Some(stack_exhausted),
            ..Default::default()
        };
        let (continuation, seen) = recording();

        let err = driver
            .execute(&invoker, &"x".to_string(), continuation)
            .unwrap_err();
        assert!(err.inner().is::<FatalError>());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invoke_event_forwards_continuation() {
        let driver = InvocationDriver::new(vec![Parameter::new(message)]);
        let invoker = Recorder::default();
        let (continuation, seen) = recording();
        let event = AsyncLogEvent::new("e".to_string(), continuation);

        let arguments = driver.prepare(&event.event).unwrap();
        driver.invoke_event(&invoker, arguments, event).unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(invoker.calls.lock().unwrap().len(), 1);
    }

    /// Keeps the continuation and completes it later, like a queued backend.
    #[derive(Default)]
    struct Deferred {
        pending: Mutex<Vec<(Continuation, SharedClassifier)>>,
    }

    impl Invoker for Deferred {
        fn invoke(&self, _arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
            Ok(())
        }

        fn invoke_with_continuation(
            &self,
            _arguments: Vec<ParameterValue>,
            continuation: Continuation,
            classifier: &SharedClassifier,
        ) -> Result<(), Unrecoverable> {
            self.pending
                .lock()
                .unwrap()
                .push((continuation, classifier.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_deferred_backend_classifies_with_driver_classifier() {
        let driver = InvocationDriver::with_parts(
            vec![Parameter::new(message)],
            ParameterRenderer::new(),
            |err: &(dyn std::error::Error + 'static)| err.to_string() == "quota exceeded",
        );
        let invoker = Deferred::default();
        let (continuation, seen) = recording();

        driver
            .execute(&invoker, &"x".to_string(), continuation)
            .unwrap();
        let (continuation, classifier) = invoker.pending.lock().unwrap().pop().unwrap();

        let result = crate::invoker::complete(
            classifier.as_ref(),
            Err("quota exceeded".into()),
            continuation,
        );
        assert!(result.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }
}
