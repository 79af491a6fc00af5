//! Local call backend wrapping a closure.

use methodcall_core::{BoxError, Invoker, ParameterValue};

/// An invoker that calls a closure with the argument array.
///
/// # Example
///
/// ```rust,ignore
/// let invoker = invoker_fn(|args| {
///     println!("{args:?}");
///     Ok(())
/// });
/// ```
#[derive(Clone)]
pub struct FnInvoker<F> {
    f: F,
}

impl<F> FnInvoker<F>
where
    F: Fn(Vec<ParameterValue>) -> Result<(), BoxError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

/// Shorthand for [`FnInvoker::new`].
pub fn invoker_fn<F>(f: F) -> FnInvoker<F>
where
    F: Fn(Vec<ParameterValue>) -> Result<(), BoxError> + Send + Sync,
{
    FnInvoker::new(f)
}

impl<F> Invoker for FnInvoker<F>
where
    F: Fn(Vec<ParameterValue>) -> Result<(), BoxError> + Send + Sync,
{
    fn invoke(&self, arguments: Vec<ParameterValue>) -> Result<(), BoxError> {
        (self.f)(arguments)
    }
}
