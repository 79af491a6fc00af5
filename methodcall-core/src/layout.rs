//! # Layout
//!
//! The rendering collaborator: turns one event into text.
//!
//! Layouts are treated as pure functions of the event. The core only ever
//! calls them through [`Layout::render_append`], appending into a buffer it
//! owns, so implementations should avoid allocating an intermediate string.
//!
//! Closures of the form `Fn(&E) -> String` are layouts:
//!
//! ```rust,ignore
//! let layout = |event: &MyEvent| event.user.clone();
//! assert_eq!(layout.render(&event), "alice");
//! ```

use std::sync::Arc;

/// Renders a single event into text.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Layout` for `{E}`",
    label = "missing `Layout` implementation",
    note = "Layouts must implement `render_append` for the event type `{E}`."
)]
pub trait Layout<E: ?Sized>: Send + Sync {
    /// Append the rendering of `event` to `buffer`.
    fn render_append(&self, event: &E, buffer: &mut String);

    /// Render `event` into a fresh string.
    fn render(&self, event: &E) -> String {
        let mut buffer = String::new();
        self.render_append(event, &mut buffer);
        buffer
    }
}

// Blanket impl for closures
impl<E, F> Layout<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> String + Send + Sync,
{
    fn render_append(&self, event: &E, buffer: &mut String) {
        buffer.push_str(&(self)(event));
    }

    fn render(&self, event: &E) -> String {
        (self)(event)
    }
}

/// A type-erased, shareable layout.
pub type SharedLayout<E> = Arc<dyn Layout<E>>;
