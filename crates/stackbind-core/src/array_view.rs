//! Lazy, read-only view over a script sequence table.

use std::fmt;
use std::marker::PhantomData;

use crate::convert::{FromValue, FromValueOwned};
use crate::error::ConversionError;
use crate::table::TableRef;
use crate::value::Value;

/// A non-owning view of a sequence table passed as an argument.
///
/// Indexing is 0-based on the Rust side: `get(i)` probes script key `i + 1`.
/// Nothing is copied up front and the length is never assumed; every
/// lookup is an independent probe, so iteration can be restarted at will.
///
/// ```ignore
/// #[function]
/// fn sum(values: ArrayView<f64>) -> Result<f64, ConversionError> {
///     values.iter().sum()
/// }
/// ```
pub struct ArrayView<T> {
    table: TableRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromValueOwned> ArrayView<T> {
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            _marker: PhantomData,
        }
    }

    /// Probe logical index `index`.
    ///
    /// `Ok(None)` means the slot is nil. An element that is present but
    /// does not convert is an error carrying its script-visible key.
    pub fn get(&self, index: usize) -> Result<Option<T>, ConversionError> {
        let Some(key) = index.checked_add(1).and_then(|k| i64::try_from(k).ok()) else {
            return Ok(None);
        };
        match self.table.geti(key) {
            Value::Nil => Ok(None),
            slot => T::from_value(&slot)
                .map(Some)
                .map_err(|source| ConversionError::element(key, source)),
        }
    }

    /// Count elements by probing until the first absent one.
    pub fn count(&self) -> Result<usize, ConversionError> {
        self.iter().try_fold(0, |count, item| item.map(|_| count + 1))
    }

    /// Iterate from index 0 until the first absent element.
    ///
    /// A bad element is yielded as an error and ends the iteration.
    pub fn iter(&self) -> ArrayViewIter<'_, T> {
        ArrayViewIter {
            view: self,
            next: 0,
            done: false,
        }
    }

    /// Collect the elements into a vector.
    pub fn to_vec(&self) -> Result<Vec<T>, ConversionError> {
        self.iter().collect()
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }
}

impl<T> Clone for ArrayView<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ArrayView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayView")
            .field("table", &self.table)
            .field("element", &std::any::type_name::<T>())
            .finish()
    }
}

/// Binds to a table argument; anything else is a type error.
impl<'v, T: FromValueOwned> FromValue<'v> for ArrayView<T> {
    fn from_value(value: &'v Value) -> Result<Self, ConversionError> {
        TableRef::from_value(value).map(ArrayView::new)
    }
}

impl<'a, T: FromValueOwned> IntoIterator for &'a ArrayView<T> {
    type Item = Result<T, ConversionError>;
    type IntoIter = ArrayViewIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an [`ArrayView`].
pub struct ArrayViewIter<'a, T> {
    view: &'a ArrayView<T>,
    next: usize,
    done: bool,
}

impl<T: FromValueOwned> Iterator for ArrayViewIter<'_, T> {
    type Item = Result<T, ConversionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.view.get(self.next) {
            Ok(Some(item)) => {
                self.next += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T: FromValueOwned> std::iter::FusedIterator for ArrayViewIter<'_, T> {}
