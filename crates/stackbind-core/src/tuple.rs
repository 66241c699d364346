//! Tuple-like values: table mode and embedded mode.
//!
//! Any [`TupleLike`] type converts in **table mode** by default: it is
//! written as one sequence table `{[1] = e0, [2] = e1, ...}` and read back
//! from one. Tuples up to arity 12 and fixed-size arrays are tuple-like out
//! of the box; records opt in with `#[derive(TupleLike)]`.
//!
//! Wrapping a return value in [`Embedded`] switches to **embedded mode**:
//! each element becomes a separate result, in declaration order. Embedding
//! does not recurse; a nested plain tuple is still written as a table unless
//! it is itself wrapped in `Embedded`.

use crate::convert::{FromValue, FromValueOwned, IntoResults, IntoValue};
use crate::error::{ConversionError, NativeError};
use crate::runtime::Results;
use crate::table::{Table, TableRef};
use crate::value::Value;

/// A fixed-size, positionally accessed aggregate.
pub trait TupleLike: Sized {
    /// Number of elements.
    const ARITY: usize;

    /// The plain tuple carrying the elements in positional order.
    type Elements;

    fn into_elements(self) -> Self::Elements;

    fn from_elements(elements: Self::Elements) -> Self;
}

/// Push each element of an aggregate as its own result.
pub trait PushEmbedded {
    fn push_embedded(self, results: &mut Results<'_>) -> Result<usize, NativeError>;
}

/// Return wrapper selecting embedded mode.
///
/// ```ignore
/// fn begin(name: &str) -> Embedded<(bool, Option<bool>)> {
///     Embedded((true, None))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Embedded<T>(pub T);

impl<T: PushEmbedded> IntoResults for Embedded<T> {
    fn push_results(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
        self.0.push_embedded(results)
    }
}

/// `None` is a single nil result, so callers can test the first result.
impl<T: PushEmbedded> IntoResults for Option<Embedded<T>> {
    fn push_results(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
        match self {
            Some(embedded) => embedded.push_results(results),
            None => {
                results.push_value(Value::Nil);
                Ok(1)
            }
        }
    }
}

fn expect_table(value: &Value) -> Result<&TableRef, ConversionError> {
    value
        .as_table()
        .ok_or_else(|| ConversionError::mismatch("table", value.type_name()))
}

/// Read element `key` (1-based) of a tuple-like table.
fn read_element<T: FromValueOwned>(table: &TableRef, key: i64) -> Result<T, ConversionError> {
    let slot = table.geti(key);
    T::from_value(&slot).map_err(|source| ConversionError::element(key, source))
}

macro_rules! impl_tuple {
    ($len:literal => $($idx:tt $T:ident),+) => {
        impl<$($T),+> TupleLike for ($($T,)+) {
            const ARITY: usize = $len;
            type Elements = Self;

            fn into_elements(self) -> Self {
                self
            }

            fn from_elements(elements: Self) -> Self {
                elements
            }
        }

        impl<'v, $($T: FromValueOwned),+> FromValue<'v> for ($($T,)+) {
            fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
                let table = expect_table(value)?;
                Ok(($(read_element::<$T>(table, $idx + 1)?,)+))
            }
        }

        impl<$($T: IntoValue),+> IntoValue for ($($T,)+) {
            fn into_value(self) -> Result<Value, ConversionError> {
                let mut table = Table::with_capacity($len);
                $(table.seti($idx + 1, self.$idx.into_value()?);)+
                Ok(Value::Table(TableRef::from(table)))
            }
        }

        impl<$($T: IntoResults),+> PushEmbedded for ($($T,)+) {
            fn push_embedded(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
                let mut count = 0;
                $(count += self.$idx.push_results(results)?;)+
                Ok(count)
            }
        }
    };
}

impl_tuple!(1 => 0 T0);
impl_tuple!(2 => 0 T0, 1 T1);
impl_tuple!(3 => 0 T0, 1 T1, 2 T2);
impl_tuple!(4 => 0 T0, 1 T1, 2 T2, 3 T3);
impl_tuple!(5 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4);
impl_tuple!(6 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5);
impl_tuple!(7 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6);
impl_tuple!(8 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7);
impl_tuple!(9 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8);
impl_tuple!(10 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9);
impl_tuple!(11 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9, 10 T10);
impl_tuple!(12 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9, 10 T10, 11 T11);

// ============================================================================
// Fixed-size arrays
// ============================================================================

impl<T, const N: usize> TupleLike for [T; N] {
    const ARITY: usize = N;
    type Elements = Self;

    fn into_elements(self) -> Self {
        self
    }

    fn from_elements(elements: Self) -> Self {
        elements
    }
}

impl<'v, T: FromValueOwned, const N: usize> FromValue<'v> for [T; N] {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        let table = expect_table(value)?;
        let mut elements = Vec::with_capacity(N);
        for key in (1..).take(N) {
            elements.push(read_element::<T>(table, key)?);
        }
        // Exactly N elements were read above.
        elements
            .try_into()
            .map_err(|_| ConversionError::mismatch("array", "table"))
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Result<Value, ConversionError> {
        let mut table = Table::with_capacity(N);
        for (key, element) in (1..).zip(self) {
            table.seti(key, element.into_value()?);
        }
        Ok(Value::Table(TableRef::from(table)))
    }
}

impl<T: IntoResults, const N: usize> PushEmbedded for [T; N] {
    fn push_embedded(self, results: &mut Results<'_>) -> Result<usize, NativeError> {
        let mut count = 0;
        for element in self {
            count += element.push_results(results)?;
        }
        Ok(count)
    }
}
