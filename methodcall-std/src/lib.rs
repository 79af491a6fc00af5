//! # methodcall-std
//!
//! Standard implementations for the methodcall target framework.
//!
//! This crate provides:
//! - **Layouts**: [`TemplateLayout`](layouts::TemplateLayout), [`Literal`](layouts::Literal)
//! - **Events**: [`LogEventInfo`](event::LogEventInfo)
//! - **Invokers**: closures, a named [`MethodTable`](invokers::MethodTable),
//!   a [`QueuedInvoker`](invokers::QueuedInvoker) for async workers and a
//!   [`TracingInvoker`](invokers::TracingInvoker) wrapper
//! - **Completion**: awaitable continuations
//! - **Testing**: recording and failing doubles

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use methodcall_core;

// Modules
pub mod completion;
pub mod event;
pub mod invokers;
pub mod layouts;
pub mod testing;
