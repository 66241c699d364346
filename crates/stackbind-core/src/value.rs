//! The engine's dynamically typed value.

use std::fmt;
use std::rc::Rc;

use crate::runtime::NativeFn;
use crate::table::TableRef;

/// A single slot value as the scripting engine sees it.
///
/// Strings are immutable byte strings with an explicit length, so embedded
/// NUL bytes survive every round trip. Tables and functions are shared
/// handles and compare by identity.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent or explicitly nil.
    #[default]
    Nil,
    Boolean(bool),
    /// The engine's native integer (64-bit signed).
    Integer(i64),
    Number(f64),
    String(Rc<[u8]>),
    Table(TableRef),
    Function(NativeFn),
}

impl Value {
    /// Build a string value from raw bytes or text.
    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        Value::String(Rc::from(bytes.as_ref()))
    }

    /// The engine-facing type name, as used in conversion errors.
    ///
    /// Integers and floats are both reported as `"number"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) | Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Engine truthiness: only `nil` and `false` are false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableRef> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Interpret the value as a numeral, following the engine's coercion
    /// rules: numbers as-is, strings when they spell a decimal or
    /// hexadecimal numeral.
    pub(crate) fn to_numeral(&self) -> Option<Numeral> {
        match self {
            Value::Integer(i) => Some(Numeral::Integer(*i)),
            Value::Number(n) => Some(Numeral::Float(*n)),
            Value::String(bytes) => parse_numeral(bytes),
            _ => None,
        }
    }
}

/// A number read out of a value before it is narrowed to a Rust type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeral {
    Integer(i64),
    Float(f64),
}

/// Lower bound of the range where `f64 -> i64` is exact and lossless.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
/// Exclusive upper bound; `i64::MAX as f64` rounds up to this value.
const I64_END_F: f64 = 9_223_372_036_854_775_808.0;

/// Convert a float to an integer only when it holds an integral value that
/// fits the engine's integer width.
pub(crate) fn float_to_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && (I64_MIN_F..I64_END_F).contains(&n) {
        Some(n as i64)
    } else {
        None
    }
}

fn parse_numeral(bytes: &[u8]) -> Option<Numeral> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    if text.is_empty() {
        return None;
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        // Hex numerals wrap around like the engine's own lexer does.
        let magnitude = u64::from_str_radix(hex, 16).ok()?;
        let value = magnitude as i64;
        return Some(Numeral::Integer(if negative {
            value.wrapping_neg()
        } else {
            value
        }));
    }

    if let Ok(i) = text.parse::<i64>() {
        return Some(Numeral::Integer(i));
    }

    // `f64::from_str` also accepts "inf" and "nan", which are not numerals.
    if digits
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E')
    {
        return None;
    }
    text.parse::<f64>().ok().map(Numeral::Float)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Integer(i), Value::Number(n)) | (Value::Number(n), Value::Integer(i)) => {
                float_to_integer(*n) == Some(*i)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::Number(n) => write!(f, "Number({n:?})"),
            Value::String(bytes) => write!(f, "String({:?})", String::from_utf8_lossy(bytes)),
            Value::Table(table) => write!(f, "{table:?}"),
            Value::Function(function) => write!(f, "{function:?}"),
        }
    }
}

/// Formats the value the way the engine's `tostring` does.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 => {
                write!(f, "{n:.1}")
            }
            Value::Number(n) if n.is_nan() => write!(f, "nan"),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}", if *n > 0.0 { "inf" } else { "-inf" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::String(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Value::Table(table) => write!(f, "table: {:p}", table.as_ptr()),
            Value::Function(function) => write!(f, "function: builtin: {:p}", function.as_ptr()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<TableRef> for Value {
    fn from(table: TableRef) -> Self {
        Value::Table(table)
    }
}

impl From<NativeFn> for Value {
    fn from(function: NativeFn) -> Self {
        Value::Function(function)
    }
}
