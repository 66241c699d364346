//! Native function storage and the invocation engine.

use std::fmt;
use std::rc::Rc;

use crate::convert::IntoResults;
use crate::defaults::{Callable, DefaultArgs, WithDefaults};
use crate::error::NativeError;

use super::CallFrame;

/// The engine's calling convention for native code.
///
/// Returns the number of results pushed, or an error the engine raises as a
/// runtime error in the calling script.
pub type EntryPoint = fn(&mut CallFrame<'_>) -> Result<usize, NativeError>;

/// Anything callable with a frame.
pub trait NativeCallable {
    fn call(&self, frame: &mut CallFrame<'_>) -> Result<usize, NativeError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallFrame<'_>) -> Result<usize, NativeError>,
{
    fn call(&self, frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
        self(frame)
    }
}

/// Type-erased native function.
///
/// Cloning is cheap and shares the underlying callable. The engine is single
/// threaded, so the callable is held in an `Rc`.
#[derive(Clone)]
pub struct NativeFn {
    inner: Rc<dyn NativeCallable>,
}

impl NativeFn {
    /// Wrap a frame-level callable.
    pub fn new<F>(callable: F) -> Self
    where
        F: NativeCallable + 'static,
    {
        Self {
            inner: Rc::new(callable),
        }
    }

    /// Wrap a static entry point, such as one generated by `#[function]`.
    pub fn from_entry(entry: EntryPoint) -> Self {
        Self::new(entry)
    }

    /// Wrap a typed Rust function. Every parameter is required.
    ///
    /// Parameters must be owned types; functions taking borrowed arguments
    /// go through `#[function]` instead.
    pub fn wrap<F, Args>(function: F) -> Self
    where
        F: Callable<Args> + 'static,
        (): DefaultArgs<Args>,
        Args: 'static,
    {
        Self::new(WithDefaults::new(function, ()))
    }

    /// Wrap a typed Rust function whose trailing parameters take `defaults`
    /// when the caller omits them.
    ///
    /// A default tuple longer than the parameter list does not type-check.
    pub fn with_defaults<F, D, Args>(function: F, defaults: D) -> Self
    where
        F: Callable<Args> + 'static,
        D: DefaultArgs<Args> + 'static,
        Args: 'static,
    {
        Self::new(WithDefaults::new(function, defaults))
    }

    pub fn call(&self, frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
        self.inner.call(frame)
    }

    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.inner).cast()
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({:p})", self.as_ptr())
    }
}

/// Invoke `function` against `frame`.
///
/// Every argument is materialised before the call; the first conversion
/// failure aborts with [`NativeError::Argument`] and the function never
/// runs. Parameters covered by `defaults` fall back to their default when
/// the caller omits them. Returns the number of results pushed.
pub fn invoke<F, D, Args>(
    frame: &mut CallFrame<'_>,
    function: &F,
    defaults: &D,
) -> Result<usize, NativeError>
where
    F: Callable<Args>,
    D: DefaultArgs<Args>,
{
    let (args, mut results) = frame.split();
    let materialized = defaults.read_args(&args)?;
    function.call_with(materialized).push_results(&mut results)
}

/// [`invoke`] with every parameter required.
pub fn invoke_native<F, Args>(frame: &mut CallFrame<'_>, function: &F) -> Result<usize, NativeError>
where
    F: Callable<Args>,
    (): DefaultArgs<Args>,
{
    invoke(frame, function, &())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::ConversionError;
    use crate::value::Value;

    fn run<F, Args>(function: &F, args: &[Value]) -> Result<Vec<Value>, NativeError>
    where
        F: Callable<Args>,
        (): DefaultArgs<Args>,
    {
        let mut out = Vec::new();
        let mut frame = CallFrame::new(args, &mut out);
        let count = invoke_native(&mut frame, function)?;
        assert_eq!(count, out.len());
        Ok(out)
    }

    #[test]
    fn unit_return_reports_zero_results() {
        let out = run(&|_: i32| {}, &[Value::Integer(1)]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn zero_arity_function() {
        let out = run(&|| "hi".to_string(), &[]).unwrap();
        assert_eq!(out, vec![Value::string("hi")]);
    }

    #[test]
    fn failed_read_never_calls_the_function() {
        let called = Cell::new(false);
        let function = |a: i32, b: i32| {
            called.set(true);
            a + b
        };
        let err = run(&function, &[Value::Integer(1), Value::string("x")]).unwrap_err();
        assert_eq!(
            err,
            NativeError::argument(2, ConversionError::mismatch("number", "string"))
        );
        assert!(!called.get());
    }

    #[test]
    fn first_failure_wins() {
        let err = run(&|a: i32, b: i32| a + b, &[Value::Nil, Value::Nil]).unwrap_err();
        assert!(matches!(err, NativeError::Argument { position: 1, .. }));
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let out = run(&|a: i64| a, &[Value::Integer(1), Value::Integer(2)]).unwrap();
        assert_eq!(out, vec![Value::Integer(1)]);
    }

    #[test]
    fn return_conversion_failure_is_reported() {
        let err = run(&|| u64::MAX, &[]).unwrap_err();
        assert!(matches!(err, NativeError::Return(_)));
    }

    #[test]
    fn fn_items_are_callable() {
        let out = run(&f64::abs, &[Value::Number(-2.5)]).unwrap();
        assert_eq!(out, vec![Value::Number(2.5)]);
    }

    #[test]
    fn twelve_parameters() {
        #[allow(clippy::too_many_arguments)]
        fn sum(
            a: i64,
            b: i64,
            c: i64,
            d: i64,
            e: i64,
            f: i64,
            g: i64,
            h: i64,
            i: i64,
            j: i64,
            k: i64,
            l: i64,
        ) -> i64 {
            a + b + c + d + e + f + g + h + i + j + k + l
        }
        let args: Vec<Value> = (1..=12).map(Value::Integer).collect();
        let out = run(&sum, &args).unwrap();
        assert_eq!(out, vec![Value::Integer(78)]);
    }
}
