//! Core of the stackbind marshalling bridge.
//!
//! This crate holds everything needed to expose a typed Rust function to a
//! dynamically typed, stack based scripting engine:
//!
//! - [`Value`], [`Table`] and [`TableRef`]: the engine's value model
//! - [`FromValue`] / [`IntoValue`] / [`IntoResults`]: per-type conversion contracts
//! - [`Embedded`], [`ArrayView`] and the [`TupleLike`] table mode: composite adapters
//! - [`ResolveDefault`], [`DefaultArgs`] and [`WithDefaults`]: trailing default arguments
//! - [`invoke`], [`CallFrame`] and [`NativeFn`]: the invocation engine
//! - [`Namespace`] and [`State`]: the install target and a reference host
//!
//! Script-visible sequences are 1-based. Everything on the Rust side is
//! 0-based, and the adapters translate exactly once at the boundary.

mod array_view;
mod convert;
mod defaults;
mod error;
mod namespace;
mod table;
mod tuple;
mod value;

pub mod runtime;

pub use array_view::{ArrayView, ArrayViewIter};
pub use convert::{FromValue, FromValueOwned, IntoResults, IntoValue};
pub use defaults::{Callable, DefaultArgs, ResolveDefault, WithDefaults};
pub use error::{ConversionError, NativeError, RuntimeError};
pub use namespace::Namespace;
pub use runtime::{
    Arguments, CallFrame, EntryPoint, NativeCallable, NativeFn, Results, State, invoke,
    invoke_native,
};
pub use table::{Table, TableKey, TableRef};
pub use tuple::{Embedded, PushEmbedded, TupleLike};
pub use value::Value;
