//! # methodcall - Log Events as Method Calls
//!
//! `methodcall` is a logging target that turns each event into a call to a
//! method. Every argument is described by a [`Parameter`]: a layout that
//! renders text from the event, and a [`ParameterType`] the text converts
//! into. Grouped parameters render once over a whole batch, with a header,
//! separators and a footer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use methodcall::prelude::*;
//! use methodcall::layouts::TemplateLayout;
//! use methodcall::invokers::invoker_fn;
//!
//! let target = TargetBuilder::new(invoker_fn(|args| {
//!     println!("record({args:?})");
//!     Ok(())
//! }))
//! .parameter(Parameter::new(TemplateLayout::parse("${logger}")?))
//! .parameter(Parameter::new(TemplateLayout::parse("${sequence}")?).with_type(ParameterType::U64))
//! .build()?;
//!
//! target.write(AsyncLogEvent::detached(LogEventInfo::message("hello")))?;
//! ```
//!
//! ## Failures
//!
//! Ordinary failures are data: they reach the event's [`Continuation`] as a
//! [`MethodCallError`]. Failures the [`FailureClassifier`] deems fatal are
//! returned from the write as [`Unrecoverable`] instead.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod builder;
mod options;
mod target;

pub use builder::TargetBuilder;
pub use options::TargetOptions;
pub use target::MethodCallTarget;

pub use methodcall_core::{
    // Delivery
    AsyncLogEvent,
    // Error types
    BoxError,
    // Buffers
    BufferPool,
    CoercionError,
    ConfigError,
    Continuation,
    DefaultClassifier,
    FailureClassifier,
    FatalError,
    FatalKind,
    GROUP_BUFFER_THRESHOLD,
    GroupLayouts,
    // Driver
    InvocationDriver,
    // Backends
    Invoker,
    // Rendering
    Layout,
    // Events
    LogEvent,
    MethodCallError,
    // Parameters
    Parameter,
    ParameterRenderer,
    ParameterType,
    ParameterValue,
    PooledBuffer,
    ReportedError,
    SharedLayout,
    Unrecoverable,
    complete,
};

pub use methodcall_std::{
    completion::{Completion, completion},
    event::{Level, LogEventInfo},
};

/// Standard layouts.
pub mod layouts {
    #![allow(clippy::wildcard_imports)]
    pub use methodcall_std::layouts::*;
}

/// Standard invocation backends.
pub mod invokers {
    #![allow(clippy::wildcard_imports)]
    pub use methodcall_std::invokers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use methodcall_std::testing::*;
}

/// Prelude module - common imports for methodcall.
///
/// # Usage
///
/// ```rust,ignore
/// use methodcall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AsyncLogEvent, BoxError, Continuation, Invoker, Layout, Level, LogEvent, LogEventInfo,
        MethodCallError, MethodCallTarget, Parameter, ParameterType, ParameterValue,
        TargetBuilder, TargetOptions, Unrecoverable,
    };
}

#[cfg(feature = "macros")]
pub use methodcall_macros::LogEvent;
