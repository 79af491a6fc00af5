use methodcall_core::{
    BoxError, ConfigError, Continuation, Invoker, ParameterValue, SharedClassifier,
    Unrecoverable,
};

/// An invoker wrapper that instruments each call with a `tracing` span.
///
/// The span is named `method_call` and records the method name and the number
/// of arguments. Without the `tracing` feature the wrapper only forwards.
pub struct TracingInvoker<I> {
    inner: I,
    name: &'static str,
}

impl<I> TracingInvoker<I> {
    /// Wrap `inner`, labelling its spans with `name`.
    pub const fn new(inner: I, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The label used for spans.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wrapped invoker.
    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: Clone> Clone for TracingInvoker<I> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<I: Invoker> Invoker for TracingInvoker<I> {
    #[cfg(feature = "tracing")]
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        let span = tracing::info_span!(
            "method_call",
            method = %self.name,
            arguments = arguments.len()
        );
        let _entered = span.enter();
        self.inner.invoke(arguments)
    }

    #[cfg(not(feature = "tracing"))]
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        self.inner.invoke(arguments)
    }

    #[cfg(feature = "tracing")]
    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        let span = tracing::info_span!(
            "method_call",
            method = %self.name,
            arguments = arguments.len()
        );
        let _entered = span.enter();
        self.inner
            .invoke_with_continuation(arguments, continuation, classifier)
    }

    #[cfg(not(feature = "tracing"))]
    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        self.inner
            .invoke_with_continuation(arguments, continuation, classifier)
    }

    fn validate(&self, parameter_count: usize) -> Result<(), ConfigError> {
        self.inner.validate(parameter_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invokers::{MethodTable, QueuedInvoker};
    use methodcall_core::DefaultClassifier;

    #[test]
    fn test_tracing_invoker_passthrough() {
        let mut table = MethodTable::new();
        table.register("Echo", 1, |_| Ok(())).unwrap();
        let invoker = TracingInvoker::new(table.resolve("Echo").unwrap(), "echo");
        let invoker = invoker.clone();

        assert_eq!(invoker.name(), "echo");
        assert!(invoker.invoke(vec![ParameterValue::from("x")]).is_ok());
        assert!(invoker.validate(1).is_ok());
        assert!(invoker.validate(2).is_err());
    }

    #[test]
    fn test_tracing_invoker_keeps_async_override() {
        let (inner, mut queue) = QueuedInvoker::channel();
        let invoker = TracingInvoker::new(inner, "queued");

        invoker
            .invoke_with_continuation(Vec::new(), Continuation::noop(), &DefaultClassifier::shared())
            .unwrap();

        // The call was queued, not completed in place.
        let call = queue.try_next().unwrap();
        call.complete(Ok(())).unwrap();
    }
}
