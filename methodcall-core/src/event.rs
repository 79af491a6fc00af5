//! Log event traits and the per-event delivery context.

use crate::continuation::Continuation;
use std::{borrow::Cow, sync::Arc};

/// A structured log event that layouts can read properties from.
///
/// Events must be `Send + Sync` so that a target can be shared across the
/// threads a dispatcher delivers from.
///
/// # Example
///
/// ```rust,ignore
/// struct Request { path: String }
///
/// impl LogEvent for Request {
///     fn property(&self, name: &str) -> Option<Cow<'_, str>> {
///         match name {
///             "path" => Some(Cow::Borrowed(&self.path)),
///             _ => None,
///         }
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `LogEvent`",
    label = "missing `LogEvent` implementation",
    note = "Implement `LogEvent::property` or use `#[derive(LogEvent)]`."
)]
pub trait LogEvent: Send + Sync {
    /// Look up a named property, rendered as text.
    fn property(&self, name: &str) -> Option<Cow<'_, str>>;
}

// A bare string is an event whose only property is its message.
impl LogEvent for String {
    fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        (name == "message").then(|| Cow::Borrowed(self.as_str()))
    }
}

impl LogEvent for &'static str {
    fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        (name == "message").then(|| Cow::Borrowed(*self))
    }
}

impl<T: LogEvent + ?Sized> LogEvent for Box<T> {
    fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).property(name)
    }
}

impl<T: LogEvent + ?Sized> LogEvent for Arc<T> {
    fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        (**self).property(name)
    }
}

/// An event paired with the continuation that must learn its outcome.
///
/// This is the delivery context a dispatcher hands to a target: the target
/// renders `event` and forwards `continuation` to the invocation driver.
#[derive(Debug)]
pub struct AsyncLogEvent<E> {
    /// The event to render.
    pub event: E,
    /// Completion callback for this event.
    pub continuation: Continuation,
}

impl<E> AsyncLogEvent<E> {
    /// Pair an event with its continuation.
    pub fn new(event: E, continuation: Continuation) -> Self {
        Self {
            event,
            continuation,
        }
    }

    /// Pair an event with a continuation that ignores the outcome.
    pub fn detached(event: E) -> Self {
        Self::new(event, Continuation::noop())
    }

    /// Split into the event and its continuation.
    pub fn into_parts(self) -> (E, Continuation) {
        (self.event, self.continuation)
    }
}
