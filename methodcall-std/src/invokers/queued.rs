//! Queued (asynchronous) call backend.
//!
//! [`QueuedInvoker`] does not perform the call itself. It hands each prepared
//! argument array, together with its continuation, to a [`CallQueue`] that an
//! async worker drains. The worker performs the remote call and completes the
//! [`PendingCall`], which reports the outcome to the original continuation.
//!
//! ```rust,ignore
//! let (invoker, mut queue) = QueuedInvoker::channel();
//!
//! tokio::spawn(async move {
//!     while let Some(call) = queue.next().await {
//!         let result = client.send(call.arguments()).await;
//!         if let Err(fatal) = call.complete(result) {
//!             // escalate to the process supervisor
//!         }
//!     }
//! });
//! ```

use futures::{
    StreamExt,
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use methodcall_core::{
    BoxError, Continuation, DefaultClassifier, Invoker, ParameterValue, SharedClassifier,
    Unrecoverable, complete,
};
use std::fmt;
use thiserror::Error;

/// The worker side of the queue has gone away.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("call queue is closed")]
pub struct QueueClosed;

/// An invocation waiting for a worker.
pub struct PendingCall {
    arguments: Vec<ParameterValue>,
    continuation: Continuation,
    classifier: SharedClassifier,
}

impl PendingCall {
    /// The argument array to call with.
    pub fn arguments(&self) -> &[ParameterValue] {
        &self.arguments
    }

    /// Take the argument array, leaving it empty.
    pub fn take_arguments(&mut self) -> Vec<ParameterValue> {
        std::mem::take(&mut self.arguments)
    }

    /// Report the call's result.
    ///
    /// The failure is classified by the classifier of the target that made
    /// the call. Recoverable failures and success go to the continuation. A
    /// fatal failure is returned to the worker, which owns escalation from
    /// here.
    pub fn complete(self, result: Result<(), BoxError>) -> Result<(), Unrecoverable> {
        complete(self.classifier.as_ref(), result, self.continuation)
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// An invoker that enqueues calls for an async worker.
#[derive(Clone)]
pub struct QueuedInvoker {
    sender: UnboundedSender<PendingCall>,
}

impl QueuedInvoker {
    /// Create an invoker and the queue its calls arrive on.
    pub fn channel() -> (Self, CallQueue) {
        let (sender, receiver) = mpsc::unbounded();
        (Self { sender }, CallQueue { receiver })
    }

    /// Returns `true` once the queue has been dropped or closed.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn enqueue(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: SharedClassifier,
    ) -> Result<(), PendingCall> {
        let call = PendingCall {
            arguments,
            continuation,
            classifier,
        };
        self.sender
            .unbounded_send(call)
            .map_err(|err| err.into_inner())
    }
}

impl Invoker for QueuedInvoker {
    /// Enqueue without tracking the outcome. The worker classifies with
    /// [`DefaultClassifier`].
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        match self.enqueue(arguments, Continuation::noop(), DefaultClassifier::shared()) {
            Ok(()) => Ok(()),
            Err(call) => {
                call.continuation.succeed();
                Err(QueueClosed.into())
            }
        }
    }

    fn invoke_with_continuation(
        &self,
        arguments: Vec<ParameterValue>,
        continuation: Continuation,
        classifier: &SharedClassifier,
    ) -> Result<(), Unrecoverable> {
        match self.enqueue(arguments, continuation, classifier.clone()) {
            Ok(()) => Ok(()),
            Err(call) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("call queue closed, reporting failure");
                call.complete(Err(QueueClosed.into()))
            }
        }
    }
}

impl fmt::Debug for QueuedInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedInvoker")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// The receiving end of a [`QueuedInvoker`].
pub struct CallQueue {
    receiver: UnboundedReceiver<PendingCall>,
}

impl CallQueue {
    /// Wait for the next call. Returns `None` once every invoker is dropped
    /// and the queue is drained.
    pub async fn next(&mut self) -> Option<PendingCall> {
        self.receiver.next().await
    }

    /// Take a call if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<PendingCall> {
        self.receiver.try_recv().ok()
    }

    /// Stop accepting new calls. Calls already queued can still be drained.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl fmt::Debug for CallQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallQueue").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use methodcall_core::{FatalError, FatalKind, MethodCallError, ReportedError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Outcomes = Arc<Mutex<Vec<Option<ReportedError>>>>;

    fn recording() -> (Continuation, Outcomes) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (Continuation::new(move |e| sink.lock().push(e)), seen)
    }

    #[test]
    fn test_continuation_waits_for_worker() {
        let (invoker, mut queue) = QueuedInvoker::channel();
        let (continuation, seen) = recording();

        invoker
            .invoke_with_continuation(
                vec![ParameterValue::from("a")],
                continuation,
                &DefaultClassifier::shared(),
            )
            .unwrap();
        assert!(seen.lock().is_empty(), "not completed until the worker runs");

        let call = queue.try_next().unwrap();
        assert_eq!(call.arguments(), &[ParameterValue::from("a")]);
        call.complete(Ok(())).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_none());
    }

    #[test]
    fn test_worker_failure_is_reported() {
        let (invoker, mut queue) = QueuedInvoker::channel();
        let (continuation, seen) = recording();

        invoker
            .invoke_with_continuation(Vec::new(), continuation, &DefaultClassifier::shared())
            .unwrap();
        queue
            .try_next()
            .unwrap()
            .complete(Err("503".into()))
            .unwrap();

        assert!(matches!(
            seen.lock()[0].as_deref(),
            Some(MethodCallError::Invocation(_))
        ));
    }

    #[test]
    fn test_worker_fatal_failure_is_returned() {
        let (invoker, mut queue) = QueuedInvoker::channel();
        let (continuation, seen) = recording();

        invoker
            .invoke_with_continuation(Vec::new(), continuation, &DefaultClassifier::shared())
            .unwrap();
        let result = queue
            .try_next()
            .unwrap()
            .complete(Err(FatalError::new(FatalKind::Aborted, "worker torn down").into()));

        assert!(result.is_err());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_worker_uses_caller_classifier() {
        let (invoker, mut queue) = QueuedInvoker::channel();
        let (continuation, seen) = recording();
        let everything_fatal: SharedClassifier =
            Arc::new(|_: &(dyn std::error::Error + 'static)| true);

        invoker
            .invoke_with_continuation(Vec::new(), continuation, &everything_fatal)
            .unwrap();
        let result = queue.try_next().unwrap().complete(Err("boom".into()));

        assert!(result.is_err());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_closed_queue_reports_failure() {
        let (invoker, queue) = QueuedInvoker::channel();
        drop(queue);
        assert!(invoker.is_closed());

        let (continuation, seen) = recording();
        invoker
            .invoke_with_continuation(Vec::new(), continuation, &DefaultClassifier::shared())
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].as_ref().unwrap().to_string().contains("call queue is closed"));
    }

    #[tokio::test]
    async fn test_async_worker_drains_queue() {
        let (invoker, mut queue) = QueuedInvoker::channel();
        let (continuation, seen) = recording();

        let worker = tokio::spawn(async move {
            let mut handled = 0;
            while let Some(call) = queue.next().await {
                handled += 1;
                call.complete(Ok(())).unwrap();
            }
            handled
        });

        invoker
            .invoke_with_continuation(Vec::new(), continuation, &DefaultClassifier::shared())
            .unwrap();
        invoker.invoke(Vec::new()).unwrap();
        drop(invoker);

        assert_eq!(worker.await.unwrap(), 2);
        assert_eq!(seen.lock().len(), 1);
    }
}
