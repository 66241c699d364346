//! Error types for the marshalling bridge.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RuntimeError          - a protected call failed, as seen by the host
//! └── NativeError       - an entry point raised an engine error
//!     ├── Argument      - bad argument #n (wraps ConversionError)
//!     ├── Return        - a result could not be written (wraps ConversionError)
//!     └── Runtime       - the native body itself failed
//! ConversionError       - one value could not cross the boundary
//! ```
//!
//! Construction-time failures (more defaults than parameters, types with no
//! script representation) are compile errors and have no runtime variant.
//! Registration failures live in `stackbind-registry`.

use thiserror::Error;

// ============================================================================
// Conversion Errors
// ============================================================================

/// A value could not be converted between its script and Rust forms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The value has the wrong kind, e.g. a table where a number was required.
    #[error("{expected} expected, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The integer does not fit the target width.
    ///
    /// Raised on read when narrowing to a Rust integer and on write when a
    /// Rust integer exceeds the engine's 64-bit signed range.
    #[error("value {value} out of range for {target_type}")]
    OutOfRange {
        value: i128,
        target_type: &'static str,
    },

    /// A float was supplied where an integer is needed and it is not integral.
    #[error("number {value} has no integer representation")]
    NoIntegerRepresentation { value: f64 },

    /// The bytes are not valid UTF-8 and a `str` was required.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// An element of a tuple-like table failed to convert.
    ///
    /// `index` is the script-visible (1-based) key.
    #[error("element [{index}]: {source}")]
    Element {
        index: i64,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub fn mismatch(expected: &'static str, actual: &'static str) -> Self {
        ConversionError::TypeMismatch { expected, actual }
    }

    pub(crate) fn element(index: i64, source: ConversionError) -> Self {
        ConversionError::Element {
            index,
            source: Box::new(source),
        }
    }
}

// ============================================================================
// Native Errors
// ============================================================================

/// An error raised by a native entry point.
///
/// The engine turns this into a runtime error carrying the display message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    /// An argument failed to convert. `position` is 1-based.
    #[error("bad argument #{position}: {source}")]
    Argument {
        position: usize,
        #[source]
        source: ConversionError,
    },

    /// A result failed to convert.
    #[error("bad result: {0}")]
    Return(#[from] ConversionError),

    /// The native function body reported a failure.
    #[error("{message}")]
    Runtime { message: String },
}

impl NativeError {
    pub fn argument(position: usize, source: ConversionError) -> Self {
        NativeError::Argument { position, source }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        NativeError::Runtime {
            message: message.into(),
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// A failed protected call, as reported back to the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("{function}: {source}")]
    Native {
        function: String,
        #[source]
        source: NativeError,
    },

    #[error("attempt to call a {actual} value (global '{name}')")]
    NotCallable { name: String, actual: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message() {
        let err = ConversionError::mismatch("number", "table");
        assert_eq!(err.to_string(), "number expected, got table");
    }

    #[test]
    fn out_of_range_message() {
        let err = ConversionError::OutOfRange {
            value: 300,
            target_type: "u8",
        };
        assert_eq!(err.to_string(), "value 300 out of range for u8");
    }

    #[test]
    fn element_message_nests() {
        let err = ConversionError::element(2, ConversionError::mismatch("number", "nil"));
        assert_eq!(err.to_string(), "element [2]: number expected, got nil");
    }

    #[test]
    fn argument_error_names_position() {
        let err = NativeError::argument(1, ConversionError::mismatch("number", "string"));
        assert_eq!(err.to_string(), "bad argument #1: number expected, got string");
    }

    #[test]
    fn conversion_converts_to_return_error() {
        let err: NativeError = ConversionError::InvalidUtf8.into();
        assert!(matches!(err, NativeError::Return(_)));
    }

    #[test]
    fn runtime_error_wraps_native() {
        let err = RuntimeError::Native {
            function: "add".into(),
            source: NativeError::runtime("boom"),
        };
        assert_eq!(err.to_string(), "add: boom");
    }

    #[test]
    fn not_callable_message() {
        let err = RuntimeError::NotCallable {
            name: "x".into(),
            actual: "nil",
        };
        assert_eq!(err.to_string(), "attempt to call a nil value (global 'x')");
    }
}
