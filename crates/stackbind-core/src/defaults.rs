//! Default-argument substitution and typed function wrapping.
//!
//! A function of arity N paired with K default values becomes callable with
//! anywhere from N - K to N arguments. Parameter `i` (0-based) is optional
//! iff `i >= N - K`; when the caller leaves it out (or passes nil) the
//! matching default is resolved and used instead. When it is supplied the
//! default is never consulted.
//!
//! Defaults are a tuple whose element `j` belongs to parameter `N - K + j`.
//! The pairing is checked by the type system, so a default tuple longer than
//! the parameter list, or one whose values do not resolve to the parameter
//! types, is rejected before the function can ever be registered:
//!
//! ```ignore
//! fn add(a: i32, b: Option<i32>) -> i32 { a + b.unwrap_or(0) }
//!
//! let add = NativeFn::with_defaults(add, (5,));
//! ```
//!
//! Parameters here must be owned. Functions that take `&str`, `&T` or
//! `&mut T` parameters use the `#[function]` attribute, which generates a
//! dedicated entry point per signature.

use std::marker::PhantomData;

use crate::convert::{FromValueOwned, IntoResults};
use crate::error::NativeError;
use crate::runtime::{Arguments, CallFrame, NativeCallable, invoke};

/// Produce the value substituted for an omitted parameter of type `T`.
///
/// Any `Clone` value resolves to itself, and to `Some(itself)` for an
/// `Option` parameter. Implement this for a lookup key when the natural
/// default cannot be written as a constant:
///
/// ```ignore
/// #[derive(Clone, Copy)]
/// enum FloatConst { Epsilon }
///
/// impl ResolveDefault<f32> for FloatConst {
///     fn resolve(&self) -> f32 {
///         match self { FloatConst::Epsilon => f32::EPSILON }
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a default for a `{T}` parameter",
    label = "no default resolution from `{Self}` to `{T}`"
)]
pub trait ResolveDefault<T> {
    fn resolve(&self) -> T;
}

impl<T: Clone> ResolveDefault<T> for T {
    fn resolve(&self) -> T {
        self.clone()
    }
}

impl<T: Clone> ResolveDefault<Option<T>> for T {
    fn resolve(&self) -> Option<T> {
        Some(self.clone())
    }
}

impl ResolveDefault<String> for &str {
    fn resolve(&self) -> String {
        (*self).to_owned()
    }
}

impl ResolveDefault<Option<String>> for &str {
    fn resolve(&self) -> Option<String> {
        Some((*self).to_owned())
    }
}

impl ResolveDefault<Vec<u8>> for &[u8] {
    fn resolve(&self) -> Vec<u8> {
        self.to_vec()
    }
}

/// A Rust function callable with an argument tuple.
///
/// Implemented for every `Fn(A1, .., An) -> R` up to twelve parameters,
/// where `R` can be returned to a script.
pub trait Callable<Args> {
    type Output: IntoResults;

    const ARITY: usize;

    fn call_with(&self, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($len:literal => $($A:ident),*) => {
        impl<Func, Ret, $($A,)*> Callable<($($A,)*)> for Func
        where
            Func: Fn($($A),*) -> Ret,
            Ret: IntoResults,
        {
            type Output = Ret;

            const ARITY: usize = $len;

            #[allow(non_snake_case)]
            fn call_with(&self, ($($A,)*): ($($A,)*)) -> Ret {
                self($($A),*)
            }
        }
    };
}

impl_callable!(0 =>);
impl_callable!(1 => A1);
impl_callable!(2 => A1, A2);
impl_callable!(3 => A1, A2, A3);
impl_callable!(4 => A1, A2, A3, A4);
impl_callable!(5 => A1, A2, A3, A4, A5);
impl_callable!(6 => A1, A2, A3, A4, A5, A6);
impl_callable!(7 => A1, A2, A3, A4, A5, A6, A7);
impl_callable!(8 => A1, A2, A3, A4, A5, A6, A7, A8);
impl_callable!(9 => A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_callable!(10 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_callable!(11 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_callable!(12 => A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// Materialise an argument tuple from a frame, with `Self` supplying the
/// defaults for the trailing parameters.
///
/// `()` means "no defaults": every parameter is required. A tuple of K
/// defaults covers the last K parameters, for functions of up to eight
/// parameters. There is no implementation for more defaults than
/// parameters.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid default set for parameters `{Args}`",
    label = "default values do not match the trailing parameters",
    note = "defaults cover the last parameters in order; there cannot be more defaults than parameters"
)]
pub trait DefaultArgs<Args> {
    /// Number of trailing parameters with a default.
    const COUNT: usize;

    fn read_args(&self, args: &Arguments<'_>) -> Result<Args, NativeError>;
}

macro_rules! impl_default_args {
    (required: [$($R:ident @ $rpos:literal),*]) => {
        impl<$($R: FromValueOwned),*> DefaultArgs<($($R,)*)> for () {
            const COUNT: usize = 0;

            #[allow(unused_variables)]
            fn read_args(&self, args: &Arguments<'_>) -> Result<($($R,)*), NativeError> {
                Ok(($(args.read::<$R>($rpos)?,)*))
            }
        }
    };
    (
        required: [$($R:ident @ $rpos:literal),*]
        optional: [$($O:ident = $D:ident . $di:tt @ $opos:literal),+]
    ) => {
        impl<$($R: FromValueOwned,)* $($O: FromValueOwned, $D: ResolveDefault<$O>,)+>
            DefaultArgs<($($R,)* $($O,)+)> for ($($D,)+)
        {
            const COUNT: usize = [$(stringify!($D)),+].len();

            fn read_args(&self, args: &Arguments<'_>) -> Result<($($R,)* $($O,)+), NativeError> {
                Ok((
                    $(args.read::<$R>($rpos)?,)*
                    $(args.read_or::<$O, $D>($opos, &self.$di)?,)+
                ))
            }
        }
    };
}

impl_default_args!(required: []);
impl_default_args!(required: [A1 @ 1]);
impl_default_args!(required: [A1 @ 1, A2 @ 2]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7, A8 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7, A8 @ 8, A9 @ 9]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7, A8 @ 8, A9 @ 9, A10 @ 10]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7, A8 @ 8, A9 @ 9, A10 @ 10, A11 @ 11]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7, A8 @ 8, A9 @ 9, A10 @ 10, A11 @ 11, A12 @ 12]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3] optional: [A4 = D4.0 @ 4]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3, A4 = D4.1 @ 4]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3, A4 = D4.2 @ 4]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3, A4 = D4.3 @ 4]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4] optional: [A5 = D5.0 @ 5]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3] optional: [A4 = D4.0 @ 4, A5 = D5.1 @ 5]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3, A4 = D4.1 @ 4, A5 = D5.2 @ 5]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3, A4 = D4.2 @ 4, A5 = D5.3 @ 5]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3, A4 = D4.3 @ 4, A5 = D5.4 @ 5]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5] optional: [A6 = D6.0 @ 6]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4] optional: [A5 = D5.0 @ 5, A6 = D6.1 @ 6]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3] optional: [A4 = D4.0 @ 4, A5 = D5.1 @ 5, A6 = D6.2 @ 6]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3, A4 = D4.1 @ 4, A5 = D5.2 @ 5, A6 = D6.3 @ 6]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3, A4 = D4.2 @ 4, A5 = D5.3 @ 5, A6 = D6.4 @ 6]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3, A4 = D4.3 @ 4, A5 = D5.4 @ 5, A6 = D6.5 @ 6]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6] optional: [A7 = D7.0 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5] optional: [A6 = D6.0 @ 6, A7 = D7.1 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4] optional: [A5 = D5.0 @ 5, A6 = D6.1 @ 6, A7 = D7.2 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3] optional: [A4 = D4.0 @ 4, A5 = D5.1 @ 5, A6 = D6.2 @ 6, A7 = D7.3 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3, A4 = D4.1 @ 4, A5 = D5.2 @ 5, A6 = D6.3 @ 6, A7 = D7.4 @ 7]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3, A4 = D4.2 @ 4, A5 = D5.3 @ 5, A6 = D6.4 @ 6, A7 = D7.5 @ 7]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3, A4 = D4.3 @ 4, A5 = D5.4 @ 5, A6 = D6.5 @ 6, A7 = D7.6 @ 7]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6, A7 @ 7] optional: [A8 = D8.0 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5, A6 @ 6] optional: [A7 = D7.0 @ 7, A8 = D8.1 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4, A5 @ 5] optional: [A6 = D6.0 @ 6, A7 = D7.1 @ 7, A8 = D8.2 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3, A4 @ 4] optional: [A5 = D5.0 @ 5, A6 = D6.1 @ 6, A7 = D7.2 @ 7, A8 = D8.3 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2, A3 @ 3] optional: [A4 = D4.0 @ 4, A5 = D5.1 @ 5, A6 = D6.2 @ 6, A7 = D7.3 @ 7, A8 = D8.4 @ 8]);
impl_default_args!(required: [A1 @ 1, A2 @ 2] optional: [A3 = D3.0 @ 3, A4 = D4.1 @ 4, A5 = D5.2 @ 5, A6 = D6.3 @ 6, A7 = D7.4 @ 7, A8 = D8.5 @ 8]);
impl_default_args!(required: [A1 @ 1] optional: [A2 = D2.0 @ 2, A3 = D3.1 @ 3, A4 = D4.2 @ 4, A5 = D5.3 @ 5, A6 = D6.4 @ 6, A7 = D7.5 @ 7, A8 = D8.6 @ 8]);
impl_default_args!(required: [] optional: [A1 = D1.0 @ 1, A2 = D2.1 @ 2, A3 = D3.2 @ 3, A4 = D4.3 @ 4, A5 = D5.4 @ 5, A6 = D6.5 @ 6, A7 = D7.6 @ 7, A8 = D8.7 @ 8]);

/// A typed function paired with its default values, callable from a frame.
pub struct WithDefaults<F, D, Args> {
    function: F,
    defaults: D,
    _args: PhantomData<fn(Args)>,
}

impl<F, D, Args> WithDefaults<F, D, Args>
where
    F: Callable<Args>,
    D: DefaultArgs<Args>,
{
    pub fn new(function: F, defaults: D) -> Self {
        Self {
            function,
            defaults,
            _args: PhantomData,
        }
    }

    /// Number of parameters the caller must supply.
    pub fn required_args(&self) -> usize {
        F::ARITY - D::COUNT
    }

    pub fn arity(&self) -> usize {
        F::ARITY
    }
}

impl<F, D, Args> NativeCallable for WithDefaults<F, D, Args>
where
    F: Callable<Args>,
    D: DefaultArgs<Args>,
{
    fn call(&self, frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
        invoke(frame, &self.function, &self.defaults)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::value::Value;

    fn call<F, D, Args>(
        wrapped: &WithDefaults<F, D, Args>,
        args: &[Value],
    ) -> Result<Vec<Value>, NativeError>
    where
        F: Callable<Args>,
        D: DefaultArgs<Args>,
    {
        let mut out = Vec::new();
        let mut frame = CallFrame::new(args, &mut out);
        wrapped.call(&mut frame)?;
        Ok(out)
    }

    #[derive(Clone, Copy)]
    enum Lookup {
        Answer,
    }

    impl ResolveDefault<i64> for Lookup {
        fn resolve(&self) -> i64 {
            match self {
                Lookup::Answer => 42,
            }
        }
    }

    #[test]
    fn optional_parameters_follow_required_ones() {
        let wrapped = WithDefaults::new(|a: i32, b: i32, c: i32| a * 100 + b * 10 + c, (9,));
        assert_eq!(wrapped.arity(), 3);
        assert_eq!(wrapped.required_args(), 2);
    }

    #[test]
    fn default_used_when_argument_missing() {
        let wrapped = WithDefaults::new(|a: i32, b: i32, c: i32| a * 100 + b * 10 + c, (9,));
        let out = call(&wrapped, &[Value::Integer(1), Value::Integer(2)]).unwrap();
        assert_eq!(out, vec![Value::Integer(129)]);
    }

    #[test]
    fn default_ignored_when_argument_supplied() {
        let consulted = Cell::new(0);
        struct Counting<'a>(&'a Cell<i32>);
        impl ResolveDefault<i32> for Counting<'_> {
            fn resolve(&self) -> i32 {
                self.0.set(self.0.get() + 1);
                0
            }
        }

        let wrapped =
            WithDefaults::new(|a: i32, b: i32, c: i32| a + b + c, (Counting(&consulted),));
        let args = [Value::Integer(1), Value::Integer(2), Value::Integer(3)];
        let out = call(&wrapped, &args).unwrap();
        assert_eq!(out, vec![Value::Integer(6)]);
        assert_eq!(consulted.get(), 0);

        call(&wrapped, &[Value::Integer(1), Value::Integer(2)]).unwrap();
        assert_eq!(consulted.get(), 1);
    }

    #[test]
    fn explicit_nil_counts_as_absent() {
        let wrapped = WithDefaults::new(|a: i32, b: i32| a + b, (5,));
        let out = call(&wrapped, &[Value::Integer(10), Value::Nil]).unwrap();
        assert_eq!(out, vec![Value::Integer(15)]);
    }

    #[test]
    fn optional_parameter_receives_some_default() {
        let wrapped = WithDefaults::new(|a: i32, b: Option<i32>| a + b.unwrap_or(0), (5,));
        assert_eq!(
            call(&wrapped, &[Value::Integer(10)]).unwrap(),
            vec![Value::Integer(15)]
        );
        assert_eq!(
            call(&wrapped, &[Value::Integer(10), Value::Integer(20)]).unwrap(),
            vec![Value::Integer(30)]
        );
    }

    #[test]
    fn required_parameters_still_fail() {
        let wrapped = WithDefaults::new(|a: i32, b: i32| a + b, (5,));
        let err = call(&wrapped, &[]).unwrap_err();
        assert!(matches!(err, NativeError::Argument { position: 1, .. }));
    }

    #[test]
    fn every_parameter_may_be_defaulted() {
        let wrapped = WithDefaults::new(|a: i32, b: i32| a - b, (10, 3));
        assert_eq!(wrapped.required_args(), 0);
        assert_eq!(call(&wrapped, &[]).unwrap(), vec![Value::Integer(7)]);
        assert_eq!(
            call(&wrapped, &[Value::Integer(4)]).unwrap(),
            vec![Value::Integer(1)]
        );
    }

    #[test]
    fn lookup_keys_resolve_indirectly() {
        let wrapped = WithDefaults::new(|x: i64| x, (Lookup::Answer,));
        assert_eq!(call(&wrapped, &[]).unwrap(), vec![Value::Integer(42)]);
    }

    #[test]
    fn string_defaults_resolve_to_owned() {
        let wrapped = WithDefaults::new(|s: String| s.len(), ("four",));
        assert_eq!(call(&wrapped, &[]).unwrap(), vec![Value::Integer(4)]);
    }

    #[test]
    fn supplied_argument_is_type_checked_in_defaulted_position() {
        let wrapped = WithDefaults::new(|a: i32, b: i32| a + b, (5,));
        let err = call(&wrapped, &[Value::Integer(1), Value::Boolean(true)]).unwrap_err();
        assert!(matches!(err, NativeError::Argument { position: 2, .. }));
    }
}
