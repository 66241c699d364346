//! # stackbind
//!
//! Expose typed Rust functions to a dynamically typed, stack based
//! scripting engine.
//!
//! The bridge has four layers:
//!
//! - conversion: [`FromValue`] and [`IntoValue`] move single values across
//!   the boundary, with range checks on every integer read and write
//! - composites: `Option<T>` for nil-able slots, tuples and
//!   [`TupleLike`] records as tables or as [`Embedded`] multiple results,
//!   and [`ArrayView`] for lazy 1-based sequence access
//! - invocation: [`invoke`] reads every argument, calls the function, then
//!   pushes its results; trailing defaults come from [`WithDefaults`] or the
//!   `#[function(defaults(...))]` attribute
//! - registration: a [`Registry`] installs a batch of named functions and
//!   constants into a [`Namespace`] in one validated pass
//!
//! ## Example
//!
//! ```
//! use stackbind::prelude::*;
//!
//! #[function(defaults(5))]
//! fn add(a: i32, b: Option<i32>) -> i32 {
//!     a + b.unwrap_or(0)
//! }
//!
//! let mut state = State::new();
//! Registry::new()
//!     .entry("add", entry!(add))
//!     .install(&mut state)
//!     .unwrap();
//!
//! assert_eq!(state.call("add", &[Value::Integer(10)]).unwrap(), vec![Value::Integer(15)]);
//! ```
//!
//! ## Rejected at compile time
//!
//! Signatures `#[function]` cannot bind are rejected by the macro itself.
//! Mismatches that only the type checker sees are rejected too.
//!
//! More defaults than parameters:
//!
//! ```compile_fail
//! use stackbind::WithDefaults;
//! let _ = WithDefaults::new(|a: i32| a, (1, 2));
//! ```
//!
//! Reading a type with no conversion, such as `char`:
//!
//! ```compile_fail
//! use stackbind::{FromValue, Value};
//! let _ = <char as FromValue>::from_value(&Value::Nil);
//! ```

pub use stackbind_core::{
    Arguments, ArrayView, ArrayViewIter, CallFrame, Callable, ConversionError, DefaultArgs,
    Embedded, EntryPoint, FromValue, FromValueOwned, IntoResults, IntoValue, Namespace,
    NativeCallable, NativeError, NativeFn, PushEmbedded, ResolveDefault, Results, RuntimeError,
    State, Table, TableKey, TableRef, TupleLike, Value, WithDefaults, invoke, invoke_native,
};
pub use stackbind_macros::{TupleLike, entry, function};
pub use stackbind_registry::{
    DuplicatePolicy, InstallSummary, RegistrationError, RegistrationProblem, RegistrationTable,
    Registry, RegistryOptions,
};

pub use stackbind_core::runtime;
pub use stackbind_modules as modules;

/// Everything needed to write and register bound functions.
pub mod prelude {
    pub use crate::{
        ArrayView, CallFrame, Embedded, EntryPoint, FromValue, IntoValue, Namespace, NativeError,
        NativeFn, RegistrationTable, Registry, RegistryOptions, State, Table, TableRef, TupleLike,
        Value, WithDefaults, entry, function,
    };
}

/// Install the bundled modules under `math_` and `string_` prefixes.
///
/// Each module is validated and installed as its own batch, math first.
pub fn install_modules(namespace: &mut impl Namespace) -> Result<InstallSummary, RegistrationError> {
    let mut summary = InstallSummary::default();
    for (prefix, registry) in [
        ("math_", modules::math::registry()),
        ("string_", modules::string::registry()),
    ] {
        let installed = Registry::with_options(RegistryOptions::new().prefix(prefix))
            .merge(registry)
            .install(namespace)?;
        tracing::debug!(prefix, functions = installed.functions, "installed module");
        summary.functions += installed.functions;
        summary.constants += installed.constants;
    }
    Ok(summary)
}
