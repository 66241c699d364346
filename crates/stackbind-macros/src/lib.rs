//! Stackbind Proc Macros
//!
//! This crate generates the per-signature glue between typed Rust functions
//! and the engine's frame-based calling convention.
//!
//! # Macros
//!
//! - `#[function]` - Generate a static entry point for a free function
//! - `entry!(path)` - Name the entry point generated for `path`
//! - `#[derive(TupleLike)]` - Give a record table-mode and embedded-mode conversions
//!
//! Generated code refers to `::stackbind_core`, which must be a dependency
//! of the crate using these macros.
//!
//! # Example
//!
//! ```ignore
//! use stackbind_macros::{entry, function};
//!
//! #[function(defaults(5))]
//! pub fn add(a: i32, b: Option<i32>) -> i32 {
//!     a + b.unwrap_or(0)
//! }
//!
//! const FUNCTIONS: &[(&str, EntryPoint)] = &[("add", entry!(add))];
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_tuple;
mod entry;
mod function;
mod types;

/// Expose a free function to scripts.
///
/// Keeps the function as written and generates a hidden entry point,
/// `__stackbind_entry_<name>`, with the engine's calling convention. Use
/// [`entry!`] to refer to it.
///
/// # Attributes
///
/// - `defaults(e1, ..., ek)` - Default values for the last `k` parameters.
///   Each expression must resolve to its parameter's type through
///   `ResolveDefault`. More defaults than parameters is a compile error.
///
/// # Parameters
///
/// - `T` - read by value
/// - `&str`, `&[u8]` - borrowed straight from the argument slot
/// - `&T` - read into a local and lent to the function
/// - `&mut T` - in/out: read into a local, lent mutably, and its final value
///   returned after the primary result
/// - `Option<&mut T>` - optional in/out: `None` when the caller passes nil,
///   returned as nil in that case
///
/// Results are pushed as: the return value (none for `()`, one per element
/// for `Embedded`), then each in/out parameter left to right.
///
/// Methods, generic functions, `char` in the signature, and references to
/// unsized types other than `str` and `[u8]` are rejected.
///
/// # Example
///
/// ```ignore
/// #[function(defaults(1))]
/// pub fn increment(value: &mut i64, step: i64) {
///     *value += step;
/// }
/// ```
#[proc_macro_attribute]
pub fn function(attr: TokenStream, item: TokenStream) -> TokenStream {
    function::function_impl(attr, item)
}

/// Name the entry point `#[function]` generated for a function.
///
/// Expands to a constant expression of type `stackbind_core::EntryPoint`,
/// usable in `const` registration tables.
///
/// ```ignore
/// const FUNCTIONS: &[(&str, EntryPoint)] = &[
///     ("floor", entry!(floor)),
///     ("lerp", entry!(crate::math::lerp)),
/// ];
/// ```
#[proc_macro]
pub fn entry(input: TokenStream) -> TokenStream {
    entry::entry_impl(input)
}

/// Derive `TupleLike` for a struct.
///
/// Fields map to positions in declaration order. The derive also provides
/// `FromValue`, `IntoValue` (table mode) and `PushEmbedded` (for
/// `Embedded<T>` returns) by delegating to the field tuple, so every field
/// type must have those conversions itself.
///
/// ```ignore
/// #[derive(TupleLike)]
/// pub struct Vec2 {
///     pub x: f64,
///     pub y: f64,
/// }
/// ```
#[proc_macro_derive(TupleLike)]
pub fn derive_tuple_like(input: TokenStream) -> TokenStream {
    derive_tuple::derive_tuple_like_impl(input)
}
