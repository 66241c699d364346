//! Conversion contracts between Rust types and script values.
//!
//! - [`FromValue`]: read a Rust value out of an argument slot
//! - [`IntoValue`]: write a Rust value into exactly one result slot
//! - [`IntoResults`]: write a return value as zero or more result slots
//!
//! ## Supported Types
//!
//! - Integers: `i8`..`i64`, `isize`, `u8`..`u64`, `usize` (range checked both ways)
//! - Floats: `f32`, `f64`
//! - Boolean: `bool` (engine truthiness on read)
//! - Byte strings: `&str`, `&[u8]` (borrowed), `String`, `Vec<u8>` (copied)
//! - `Option<T>` (nil is `None`), [`Value`], [`TableRef`], [`NativeFn`]
//! - Tuples, arrays and `#[derive(TupleLike)]` records (table mode)
//! - Unit `()` and `Result<T, E>` as return types
//!
//! `char` is deliberately absent: the engine has no fixed-width character
//! type, so callers convert to an integer or a string first.

use std::fmt::Display;

use crate::error::{ConversionError, NativeError};
use crate::runtime::{NativeFn, Results};
use crate::table::TableRef;
use crate::value::{Numeral, Value, float_to_integer};

/// Read a Rust value out of a script value.
///
/// The lifetime lets borrowed types such as `&str` point straight into the
/// slot without copying.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be read from a script value",
    label = "no conversion contract for `{Self}`",
    note = "`char` has no script representation; take a `u32` or a `&str` instead"
)]
pub trait FromValue<'v>: Sized {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError>;
}

/// A [`FromValue`] type that does not borrow from the slot.
///
/// Table elements and generically wrapped functions need this, since their
/// values do not outlive the read.
pub trait FromValueOwned: for<'v> FromValue<'v> {}

impl<T> FromValueOwned for T where T: for<'v> FromValue<'v> {}

/// Write a Rust value as a single script value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be written as a script value",
    label = "no conversion contract for `{Self}`",
    note = "`char` has no script representation; return a `u32` or a `String` instead"
)]
pub trait IntoValue {
    fn into_value(self) -> Result<Value, ConversionError>;
}

/// Write a return value as zero or more results.
///
/// Every [`IntoValue`] type writes one result. `()` writes none, and
/// [`Embedded`](crate::Embedded) writes one per element.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned to a script",
    label = "no result contract for `{Self}`"
)]
pub trait IntoResults {
    /// Push the results and report how many were pushed.
    fn push_results(self, results: &mut Results<'_>) -> Result<usize, NativeError>;
}

impl<T: IntoValue> IntoResults for T {
    fn push_results(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
        results.push(self)?;
        Ok(1)
    }
}

impl IntoResults for () {
    fn push_results(self, _results: &mut Results<'_>) -> Result<usize, NativeError> {
        Ok(0)
    }
}

/// `Err` raises a runtime error carrying the error's message.
impl<T, E> IntoResults for Result<T, E>
where
    T: IntoResults,
    E: Display,
{
    fn push_results(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
        match self {
            Ok(value) => value.push_results(results),
            Err(err) => Err(NativeError::runtime(err.to_string())),
        }
    }
}

// ============================================================================
// Numeric helpers
// ============================================================================

fn read_integer(value: &Value) -> Result<i64, ConversionError> {
    match value.to_numeral() {
        Some(Numeral::Integer(i)) => Ok(i),
        Some(Numeral::Float(n)) => {
            float_to_integer(n).ok_or(ConversionError::NoIntegerRepresentation { value: n })
        }
        None => Err(ConversionError::mismatch("number", value.type_name())),
    }
}

fn read_number(value: &Value) -> Result<f64, ConversionError> {
    match value.to_numeral() {
        Some(Numeral::Integer(i)) => Ok(i as f64),
        Some(Numeral::Float(n)) => Ok(n),
        None => Err(ConversionError::mismatch("number", value.type_name())),
    }
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl<'v> FromValue<'v> for $ty {
                fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
                    let raw = read_integer(value)?;
                    <$ty>::try_from(raw).map_err(|_| ConversionError::OutOfRange {
                        value: raw as i128,
                        target_type: stringify!($ty),
                    })
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value, ConversionError> {
                    // Widths above 64 bits (and u64 above i64::MAX) do not
                    // fit the engine integer.
                    i64::try_from(self)
                        .map(Value::Integer)
                        .map_err(|_| ConversionError::OutOfRange {
                            value: self as i128,
                            target_type: "integer",
                        })
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// ============================================================================
// Float implementations
// ============================================================================

impl<'v> FromValue<'v> for f64 {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        read_number(value)
    }
}

/// Narrowing rounds to the nearest `f32`; precision loss is expected.
impl<'v> FromValue<'v> for f32 {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        read_number(value).map(|n| n as f32)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::Number(self))
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::Number(f64::from(self)))
    }
}

// ============================================================================
// Boolean
// ============================================================================

/// Never fails: any value has a truthiness.
impl<'v> FromValue<'v> for bool {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        Ok(value.is_truthy())
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::Boolean(self))
    }
}

// ============================================================================
// Strings
// ============================================================================

/// Borrowed reads require an actual string; there is nothing to borrow from a number.
impl<'v> FromValue<'v> for &'v [u8] {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        value
            .as_bytes()
            .ok_or_else(|| ConversionError::mismatch("string", value.type_name()))
    }
}

impl<'v> FromValue<'v> for &'v str {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        let bytes = <&[u8]>::from_value(value)?;
        std::str::from_utf8(bytes).map_err(|_| ConversionError::InvalidUtf8)
    }
}

/// Owned reads also accept numbers, formatted the way the engine does.
impl<'v> FromValue<'v> for Vec<u8> {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(bytes) => Ok(bytes.to_vec()),
            Value::Integer(_) | Value::Number(_) => Ok(value.to_string().into_bytes()),
            other => Err(ConversionError::mismatch("string", other.type_name())),
        }
    }
}

impl<'v> FromValue<'v> for String {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        String::from_utf8(Vec::<u8>::from_value(value)?).map_err(|_| ConversionError::InvalidUtf8)
    }
}

impl IntoValue for &[u8] {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::string(self))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::string(self))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::string(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::string(self))
    }
}

// ============================================================================
// Optional values
// ============================================================================

/// `nil` (including a missing argument) reads as `None`.
impl<'v, T: FromValue<'v>> FromValue<'v> for Option<T> {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value, ConversionError> {
        match self {
            Some(value) => value.into_value(),
            None => Ok(Value::Nil),
        }
    }
}

// ============================================================================
// Engine handles
// ============================================================================

impl<'v> FromValue<'v> for Value {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl<'v> FromValue<'v> for &'v Value {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(self)
    }
}

impl<'v> FromValue<'v> for TableRef {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        value
            .as_table()
            .cloned()
            .ok_or_else(|| ConversionError::mismatch("table", value.type_name()))
    }
}

impl IntoValue for TableRef {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::Table(self))
    }
}

impl<'v> FromValue<'v> for NativeFn {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        value
            .as_function()
            .cloned()
            .ok_or_else(|| ConversionError::mismatch("function", value.type_name()))
    }
}

impl IntoValue for NativeFn {
    fn into_value(self) -> Result<Value, ConversionError> {
        Ok(Value::Function(self))
    }
}
