//! Fixed-text layout.

use methodcall_core::Layout;

/// A layout that ignores the event and always renders the same text.
///
/// Handy for group headers, separators and footers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(String);

impl Literal {
    /// Create a literal layout.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The rendered text.
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl<E: ?Sized> Layout<E> for Literal {
    fn render_append(&self, _event: &E, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_ignores_event() {
        let layout = Literal::new(", ");
        assert_eq!(Layout::<u32>::render(&layout, &1), ", ");
        assert_eq!(Layout::<str>::render(&layout, "anything"), ", ");
    }
}
