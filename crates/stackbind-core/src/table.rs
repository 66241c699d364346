//! Engine-side associative tables.
//!
//! A [`Table`] maps [`TableKey`]s to [`Value`]s. Positional data lives under
//! the integer keys `1..=n`, which is the only shape the sequence adapters
//! rely on. Floats with an exact integer value are normalised to integer keys
//! so `t[2]` and `t[2.0]` address the same slot.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::error::ConversionError;
use crate::value::{Value, float_to_integer};

/// A hashable table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    Boolean(bool),
    Integer(i64),
    /// Non-integral, non-NaN float.
    Number(OrderedFloat<f64>),
    String(Rc<[u8]>),
}

impl TableKey {
    /// Convert a value into a key.
    ///
    /// `nil`, NaN, tables and functions cannot be used as keys.
    pub fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Boolean(b) => Ok(TableKey::Boolean(*b)),
            Value::Integer(i) => Ok(TableKey::Integer(*i)),
            Value::Number(n) if n.is_nan() => Err(ConversionError::TypeMismatch {
                expected: "table key",
                actual: "NaN",
            }),
            Value::Number(n) => Ok(match float_to_integer(*n) {
                Some(i) => TableKey::Integer(i),
                None => TableKey::Number(OrderedFloat(*n)),
            }),
            Value::String(bytes) => Ok(TableKey::String(Rc::clone(bytes))),
            other => Err(ConversionError::TypeMismatch {
                expected: "table key",
                actual: other.type_name(),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            TableKey::Boolean(b) => Value::Boolean(*b),
            TableKey::Integer(i) => Value::Integer(*i),
            TableKey::Number(n) => Value::Number(n.into_inner()),
            TableKey::String(bytes) => Value::String(Rc::clone(bytes)),
        }
    }
}

impl From<i64> for TableKey {
    fn from(i: i64) -> Self {
        TableKey::Integer(i)
    }
}

impl From<&str> for TableKey {
    fn from(s: &str) -> Self {
        TableKey::String(Rc::from(s.as_bytes()))
    }
}

/// Table storage.
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: FxHashMap<TableKey, Value>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Build a sequence table holding `values` under keys `1..=n`.
    ///
    /// Nil values leave holes; the sequence border stops at the first one.
    pub fn sequence(values: impl IntoIterator<Item = Value>) -> Self {
        let mut table = Table::new();
        for (key, value) in (1..).zip(values) {
            table.seti(key, value);
        }
        table
    }

    pub fn get(&self, key: &TableKey) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Positional read. Missing keys read as `nil`.
    pub fn geti(&self, index: i64) -> Value {
        self.entries
            .get(&TableKey::Integer(index))
            .cloned()
            .unwrap_or_default()
    }

    /// Store a value. Storing `nil` removes the key.
    pub fn set(&mut self, key: TableKey, value: Value) {
        if value.is_nil() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    pub fn seti(&mut self, index: i64, value: Value) {
        self.set(TableKey::Integer(index), value);
    }

    /// The sequence border: the largest `n` such that keys `1..=n` are all present.
    pub fn border(&self) -> usize {
        let mut n = 0usize;
        while self.entries.contains_key(&TableKey::Integer(n as i64 + 1)) {
            n += 1;
        }
        n
    }

    /// Number of stored entries, positional or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &Value)> {
        self.entries.iter()
    }
}

/// Shared handle to a [`Table`].
///
/// Handles are reference counted and single threaded, like the engine
/// itself. Clones alias the same table.
#[derive(Clone, Default)]
pub struct TableRef {
    inner: Rc<RefCell<Table>>,
}

impl TableRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional read; the borrow is released before returning.
    pub fn geti(&self, index: i64) -> Value {
        self.inner.borrow().geti(index)
    }

    pub fn seti(&self, index: i64, value: Value) {
        self.inner.borrow_mut().seti(index, value);
    }

    /// Keyed read. Keys that cannot exist read as `nil`.
    pub fn get(&self, key: &Value) -> Value {
        match TableKey::from_value(key) {
            Ok(key) => self.inner.borrow().get(&key).cloned().unwrap_or_default(),
            Err(_) => Value::Nil,
        }
    }

    pub fn set(&self, key: &Value, value: Value) -> Result<(), ConversionError> {
        let key = TableKey::from_value(key)?;
        self.inner.borrow_mut().set(key, value);
        Ok(())
    }

    pub fn border(&self) -> usize {
        self.inner.borrow().border()
    }

    pub fn borrow(&self) -> Ref<'_, Table> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Table> {
        self.inner.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &TableRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.inner).cast()
    }
}

impl From<Table> for TableRef {
    fn from(table: Table) -> Self {
        Self {
            inner: Rc::new(RefCell::new(table)),
        }
    }
}

impl fmt::Debug for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table({:p})", self.as_ptr())
    }
}
