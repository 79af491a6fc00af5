//! Parameter descriptors.
//!
//! A [`Parameter`] describes one positional argument: the type its rendered
//! text converts into, the layout producing that text, and optionally the
//! group layouts used when the parameter is computed once per batch.
//!
//! Descriptors are built at configuration time and never change afterwards.
//! They hold their layouts behind `Arc`, so cloning is cheap and a list of
//! descriptors can be shared by every invocation.

use crate::{
    layout::{Layout, SharedLayout},
    value::ParameterType,
};
use std::{fmt, sync::Arc};

/// Static configuration for one argument.
///
/// # Example
///
/// ```rust,ignore
/// let level = Parameter::new(TemplateLayout::parse("${level}")?)
///     .with_name("level")
///     .with_type(ParameterType::I32);
///
/// let messages = Parameter::new(TemplateLayout::parse("${message}")?)
///     .grouped()
///     .header(Literal::new("["))
///     .separator(Literal::new(","))
///     .footer(Literal::new("]"));
/// ```
pub struct Parameter<E: ?Sized> {
    name: Option<String>,
    parameter_type: ParameterType,
    layout: Option<SharedLayout<E>>,
    is_grouped: bool,
    header: Option<SharedLayout<E>>,
    separator: Option<SharedLayout<E>>,
    footer: Option<SharedLayout<E>>,
}

impl<E: ?Sized> Parameter<E> {
    /// A string parameter rendered with `layout`.
    pub fn new(layout: impl Layout<E> + 'static) -> Self {
        Self::from_shared(Some(Arc::new(layout)))
    }

    /// A parameter without a value layout. It renders as empty text.
    pub fn empty() -> Self {
        Self::from_shared(None)
    }

    /// A string parameter rendered with an already shared layout.
    pub fn from_shared(layout: Option<SharedLayout<E>>) -> Self {
        Self {
            name: None,
            parameter_type: ParameterType::String,
            layout,
            is_grouped: false,
            header: None,
            separator: None,
            footer: None,
        }
    }

    /// Set a name used in diagnostics.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the type the rendered text converts into.
    ///
    /// Ignored for grouped parameters, which always produce text.
    pub fn with_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = parameter_type;
        self
    }

    /// Compute this parameter once per batch instead of once per event.
    pub fn grouped(mut self) -> Self {
        self.is_grouped = true;
        self
    }

    /// Layout rendered once before a group, seeded with the first event.
    pub fn header(mut self, layout: impl Layout<E> + 'static) -> Self {
        self.header = Some(Arc::new(layout));
        self
    }

    /// Layout rendered between group items, seeded with the following event.
    pub fn separator(mut self, layout: impl Layout<E> + 'static) -> Self {
        self.separator = Some(Arc::new(layout));
        self
    }

    /// Layout rendered once after a group, seeded with the last event.
    pub fn footer(mut self, layout: impl Layout<E> + 'static) -> Self {
        self.footer = Some(Arc::new(layout));
        self
    }

    /// Diagnostic name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared target type.
    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    /// The value layout.
    pub fn layout(&self) -> Option<&SharedLayout<E>> {
        self.layout.as_ref()
    }

    /// Whether the parameter is computed once per batch.
    pub fn is_grouped(&self) -> bool {
        self.is_grouped
    }

    /// The group layouts, or `None` when the parameter is not grouped.
    pub fn group(&self) -> Option<GroupLayouts<'_, E>> {
        self.is_grouped.then(|| GroupLayouts {
            header: self.header.as_deref(),
            separator: self.separator.as_deref(),
            footer: self.footer.as_deref(),
        })
    }
}

/// Borrowed view of a grouped parameter's layouts. Each may be absent.
pub struct GroupLayouts<'a, E: ?Sized> {
    /// Rendered once, seeded with the first event.
    pub header: Option<&'a dyn Layout<E>>,
    /// Rendered before every item but the first, seeded with that item.
    pub separator: Option<&'a dyn Layout<E>>,
    /// Rendered once, seeded with the last event.
    pub footer: Option<&'a dyn Layout<E>>,
}

impl<E: ?Sized> Clone for Parameter<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            parameter_type: self.parameter_type,
            layout: self.layout.clone(),
            is_grouped: self.is_grouped,
            header: self.header.clone(),
            separator: self.separator.clone(),
            footer: self.footer.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for Parameter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("parameter_type", &self.parameter_type)
            .field("has_layout", &self.layout.is_some())
            .field("is_grouped", &self.is_grouped)
            .finish_non_exhaustive()
    }
}
