//! The per-call stack frame handed to native entry points.

use std::fmt;

use crate::convert::{FromValue, IntoValue};
use crate::defaults::ResolveDefault;
use crate::error::{ConversionError, NativeError};
use crate::value::Value;

const NIL: &Value = &Value::Nil;

/// Argument and result area for one native call.
///
/// Arguments are addressed positionally from 1; positions past the end read
/// as `nil`, which the optional and default adapters treat as "not
/// provided". The frame is owned by the engine for the duration of the call
/// and never retained beyond it.
///
/// ```ignore
/// fn entry(frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
///     let (args, mut results) = frame.split();
///     let x: f64 = args.read(1)?;
///     results.push(x.sqrt())?;
///     Ok(1)
/// }
/// ```
pub struct CallFrame<'vm> {
    args: &'vm [Value],
    results: &'vm mut Vec<Value>,
}

impl<'vm> CallFrame<'vm> {
    pub fn new(args: &'vm [Value], results: &'vm mut Vec<Value>) -> Self {
        Self { args, results }
    }

    /// Number of arguments actually supplied by the caller.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Argument at 1-based `position`, or `nil` if it was not supplied.
    pub fn arg(&self, position: usize) -> &'vm Value {
        Arguments { values: self.args }.get(position)
    }

    /// Push one result.
    pub fn push<T: IntoValue>(&mut self, value: T) -> Result<(), ConversionError> {
        self.results.push(value.into_value()?);
        Ok(())
    }

    /// Number of results pushed so far.
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Split into a read-only argument view and a result sink, so borrowed
    /// arguments can stay alive while results are written.
    pub fn split(&mut self) -> (Arguments<'vm>, Results<'_>) {
        (
            Arguments { values: self.args },
            Results {
                values: &mut *self.results,
            },
        )
    }
}

impl fmt::Debug for CallFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallFrame")
            .field("arg_count", &self.args.len())
            .field("result_count", &self.results.len())
            .finish()
    }
}

/// Positional, read-only access to a call's arguments.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'vm> {
    values: &'vm [Value],
}

impl<'vm> Arguments<'vm> {
    pub fn new(values: &'vm [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at 1-based `position`, or `nil`.
    pub fn get(&self, position: usize) -> &'vm Value {
        position
            .checked_sub(1)
            .and_then(|index| self.values.get(index))
            .unwrap_or(NIL)
    }

    /// Read the argument at `position` as `T`.
    pub fn read<T: FromValue<'vm>>(&self, position: usize) -> Result<T, NativeError> {
        T::from_value(self.get(position)).map_err(|source| NativeError::argument(position, source))
    }

    /// Read the argument at `position`, substituting `default` when it is
    /// absent or nil. The default is not consulted otherwise.
    pub fn read_or<T, D>(&self, position: usize, default: &D) -> Result<T, NativeError>
    where
        T: FromValue<'vm>,
        D: ResolveDefault<T> + ?Sized,
    {
        match self.get(position) {
            Value::Nil => Ok(default.resolve()),
            value => T::from_value(value).map_err(|source| NativeError::argument(position, source)),
        }
    }
}

/// Write access to a call's result area.
pub struct Results<'r> {
    values: &'r mut Vec<Value>,
}

impl<'r> Results<'r> {
    pub fn new(values: &'r mut Vec<Value>) -> Self {
        Self { values }
    }

    pub fn push<T: IntoValue>(&mut self, value: T) -> Result<(), ConversionError> {
        self.values.push(value.into_value()?);
        Ok(())
    }

    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Results<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Results").field("len", &self.values.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let args = [Value::Integer(10), Value::Integer(20)];
        let mut out = Vec::new();
        let frame = CallFrame::new(&args, &mut out);
        assert_eq!(frame.arg_count(), 2);
        assert_eq!(frame.arg(1), &Value::Integer(10));
        assert_eq!(frame.arg(2), &Value::Integer(20));
    }

    #[test]
    fn missing_positions_read_as_nil() {
        let args = [Value::Integer(10)];
        let mut out = Vec::new();
        let frame = CallFrame::new(&args, &mut out);
        assert!(frame.arg(0).is_nil());
        assert!(frame.arg(2).is_nil());
    }

    #[test]
    fn read_reports_position() {
        let args = [Value::Integer(1), Value::Boolean(true)];
        let arguments = Arguments::new(&args);
        let err = arguments.read::<i32>(2).unwrap_err();
        assert_eq!(
            err,
            NativeError::argument(2, ConversionError::mismatch("number", "boolean"))
        );
    }

    #[test]
    fn read_or_substitutes_only_when_absent() {
        let args = [Value::Integer(1), Value::Nil];
        let arguments = Arguments::new(&args);
        assert_eq!(arguments.read_or::<i32, _>(1, &99).unwrap(), 1);
        assert_eq!(arguments.read_or::<i32, _>(2, &99).unwrap(), 99);
        assert_eq!(arguments.read_or::<i32, _>(3, &99).unwrap(), 99);
    }

    #[test]
    fn read_or_still_validates_supplied_values() {
        let args = [Value::string("x")];
        let arguments = Arguments::new(&args);
        assert!(arguments.read_or::<i32, _>(1, &0).is_err());
    }

    #[test]
    fn split_allows_borrowed_arguments_while_pushing() {
        let args = [Value::string("echo")];
        let mut out = Vec::new();
        let mut frame = CallFrame::new(&args, &mut out);
        let (arguments, mut results) = frame.split();
        let text: &str = arguments.read(1).unwrap();
        results.push(text).unwrap();
        results.push_value(Value::Nil);
        assert_eq!(results.len(), 2);
        assert_eq!(frame.result_count(), 2);
        drop(frame);
        assert_eq!(out, vec![Value::string("echo"), Value::Nil]);
    }
}
