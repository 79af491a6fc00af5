//! # methodcall-core
//!
//! Core traits and algorithms for turning log events into method calls.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! backends and layouts that don't need the full `methodcall-std`
//! implementation.
//!
//! # Pipeline
//!
//! A dispatcher hands a target one event or a batch of events. The target
//! renders every configured [`Parameter`] into a positional argument array,
//! calls an [`Invoker`], and reports the outcome through a [`Continuation`].
//!
//! ## Parameter Descriptor ([`Parameter`])
//!
//! Static, shared configuration for one argument: the [`ParameterType`] its
//! text converts into, the [`Layout`] producing that text, and optional group
//! layouts for parameters computed once per batch.
//!
//! ## Parameter Renderer ([`ParameterRenderer`])
//!
//! Produces argument values for one event or a whole batch, bounding buffer
//! growth on very large batches and optionally reusing buffers from a
//! [`BufferPool`].
//!
//! ## Invocation Driver ([`InvocationDriver`])
//!
//! Prepare, invoke, complete. Ordinary failures become data handed to the
//! continuation; failures a [`FailureClassifier`] deems fatal are returned to
//! the caller as [`Unrecoverable`].
//!
//! # Error Types
//!
//! - [`MethodCallError`] - What a continuation receives
//! - [`CoercionError`] - Text that does not convert to the declared type
//! - [`ConfigError`] - Invalid configuration
//! - [`FatalError`] - Marker for process-fatal backend failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod buffer;
mod continuation;
mod driver;
mod error;
mod event;
mod invoker;
mod layout;
mod parameter;
mod render;
mod value;

// Re-exports
pub use buffer::{
    BufferPool, DEFAULT_MAX_POOLED_CAPACITY, DEFAULT_POOL_SIZE, GROUP_BUFFER_THRESHOLD,
    LOCAL_BUFFER_CAPACITY, POOLED_BATCH_LIMIT, PooledBuffer,
};
pub use continuation::Continuation;
pub use driver::InvocationDriver;
pub use error::{
    BoxError, CoercionError, ConfigError, FatalError, FatalKind, MethodCallError, ReportedError,
    Unrecoverable,
};
pub use event::{AsyncLogEvent, LogEvent};
pub use invoker::{DefaultClassifier, FailureClassifier, Invoker, SharedClassifier, complete};
pub use layout::{Layout, SharedLayout};
pub use parameter::{GroupLayouts, Parameter};
pub use render::ParameterRenderer;
pub use value::{ParameterType, ParameterValue};
