//! Native entry points and their execution context.
//!
//! ## Key Types
//!
//! - [`CallFrame`]: the engine's per-call argument and result area
//! - [`Arguments`] / [`Results`]: the two halves of a split frame
//! - [`NativeFn`]: type-erased, reference counted entry point
//! - [`State`]: a reference host with a global namespace and protected calls

mod call_frame;
mod native_fn;
mod state;

pub use call_frame::{Arguments, CallFrame, Results};
pub use native_fn::{EntryPoint, NativeCallable, NativeFn, invoke, invoke_native};
pub use state::{RESERVED, State};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NativeError;
    use crate::value::Value;

    #[test]
    fn closure_entry_point_reads_and_pushes() {
        let double = NativeFn::new(|frame: &mut CallFrame<'_>| -> Result<usize, NativeError> {
            let (args, mut results) = frame.split();
            let x: i64 = args.read(1)?;
            results.push(x * 2)?;
            Ok(1)
        });

        let out = State::call_function(&double, &[Value::Integer(21)]).unwrap();
        assert_eq!(out, vec![Value::Integer(42)]);
    }

    #[test]
    fn entry_point_errors_surface_unchanged() {
        fn fail(_frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
            Err(NativeError::runtime("nope"))
        }

        let function = NativeFn::from_entry(fail);
        let err = State::call_function(&function, &[]).unwrap_err();
        assert_eq!(err, NativeError::runtime("nope"));
    }

    #[test]
    fn generic_wrap_marshals_arguments() {
        let function = NativeFn::wrap(|a: i32, b: i32| a - b);
        let out = State::call_function(&function, &[Value::Integer(5), Value::Integer(3)]).unwrap();
        assert_eq!(out, vec![Value::Integer(2)]);
    }

    #[test]
    fn clones_share_the_callable() {
        let function = NativeFn::wrap(|| 1i32);
        let copy = function.clone();
        assert!(function.ptr_eq(&copy));
        assert!(!function.ptr_eq(&NativeFn::wrap(|| 1i32)));
    }
}
