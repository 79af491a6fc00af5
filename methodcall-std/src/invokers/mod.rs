//! Standard invocation backends.

mod function;
mod method_table;
mod queued;
mod traced;

pub use function::{FnInvoker, invoker_fn};
pub use method_table::{Method, MethodInvoker, MethodTable};
pub use queued::{CallQueue, PendingCall, QueueClosed, QueuedInvoker};
pub use traced::TracingInvoker;
