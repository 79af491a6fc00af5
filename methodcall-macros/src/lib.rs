//! # methodcall-macros
//!
//! Procedural macros for methodcall.
//!
//! Use through the `methodcall` crate with the `macros` feature enabled.

use proc_macro::TokenStream;

mod event;

/// Derive `LogEvent` for a struct with named fields.
///
/// Every field becomes a property named after the field and rendered with
/// its `Display` implementation.
///
/// # Field attributes
///
/// - `#[log(rename = "name")]` exposes the field under another name
/// - `#[log(skip)]` hides the field
///
/// # Example
///
/// ```rust,ignore
/// #[derive(LogEvent)]
/// struct Login {
///     user: String,
///     #[log(rename = "attempt_no")]
///     attempt: u32,
///     #[log(skip)]
///     password: String,
/// }
/// ```
#[proc_macro_derive(LogEvent, attributes(log))]
pub fn derive_log_event(input: TokenStream) -> TokenStream {
    event::derive_log_event_impl(input)
}
