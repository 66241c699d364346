//! A minimal host state: globals plus protected calls.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{NativeError, RuntimeError};
use crate::namespace::Namespace;
use crate::value::Value;

use super::{CallFrame, NativeFn};

/// Identifiers scripts cannot rebind.
pub const RESERVED: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while", "_G",
    "_ENV", "_VERSION",
];

/// Host-side engine state.
///
/// Holds the global namespace that registries install into, and runs
/// native functions as protected calls: a failing call is returned as a
/// [`RuntimeError`] and any results it pushed are discarded.
#[derive(Default)]
pub struct State {
    globals: FxHashMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a global. Unbound names read as `nil`.
    pub fn global(&self, name: &str) -> Value {
        self.globals.get(name).cloned().unwrap_or_default()
    }

    /// Bind a global. Binding `nil` removes it.
    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if value.is_nil() {
            self.globals.remove(&name);
        } else {
            self.globals.insert(name, value);
        }
    }

    pub fn globals(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.globals.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Call the global function `name` with `args` in protected mode.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
        let function = match self.globals.get(name) {
            Some(Value::Function(function)) => function,
            other => {
                let actual = other.map_or("nil", Value::type_name);
                return Err(RuntimeError::NotCallable {
                    name: name.to_owned(),
                    actual,
                });
            }
        };

        Self::call_function(function, args).map_err(|source| {
            tracing::debug!(function = name, error = %source, "protected call failed");
            RuntimeError::Native {
                function: name.to_owned(),
                source,
            }
        })
    }

    /// Run a native function on a fresh frame and collect its results.
    pub fn call_function(function: &NativeFn, args: &[Value]) -> Result<Vec<Value>, NativeError> {
        let mut results = Vec::new();
        let mut frame = CallFrame::new(args, &mut results);
        let count = function.call(&mut frame)?;
        // The reported count selects the topmost results.
        let start = results.len().saturating_sub(count);
        results.drain(..start);
        Ok(results)
    }
}

impl Namespace for State {
    fn is_reserved(&self, name: &str) -> bool {
        RESERVED.contains(&name)
    }

    fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    fn define(&mut self, name: &str, value: Value) {
        self.set_global(name, value);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("globals", &self.globals.len())
            .finish_non_exhaustive()
    }
}
