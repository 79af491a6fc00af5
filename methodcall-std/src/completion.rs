//! Awaitable continuations.
//!
//! [`completion`] pairs a [`Continuation`] with a [`Completion`] future that
//! resolves to the reported outcome. Useful when the writer wants to wait for
//! a queued call to finish.

use futures::channel::oneshot;
use methodcall_core::{Continuation, MethodCallError, ReportedError};
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// Create a continuation and a future resolving to its outcome.
///
/// If the continuation is dropped without being completed, the future
/// resolves to [`MethodCallError::Abandoned`].
///
/// # Example
///
/// ```rust,ignore
/// let (continuation, done) = completion();
/// target.write(AsyncLogEvent::new(event, continuation))?;
/// done.await?;
/// ```
pub fn completion() -> (Continuation, Completion) {
    let (sender, receiver) = oneshot::channel();
    let continuation = Continuation::new(move |error: Option<ReportedError>| {
        let _ = sender.send(error);
    });
    (continuation, Completion { receiver })
}

/// The outcome of a continuation created by [`completion`].
#[must_use = "futures do nothing unless polled"]
pub struct Completion {
    receiver: oneshot::Receiver<Option<ReportedError>>,
}

impl Future for Completion {
    type Output = Result<(), ReportedError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(None)) => Poll::Ready(Ok(())),
            Poll::Ready(Ok(Some(error))) => Poll::Ready(Err(error)),
            Poll::Ready(Err(oneshot::Canceled)) => {
                Poll::Ready(Err(Arc::new(MethodCallError::Abandoned)))
            }
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}
