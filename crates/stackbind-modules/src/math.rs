//! Math module: numeric helpers, 2D vectors and integer limits.

use stackbind_core::{ArrayView, ConversionError, Embedded};
use stackbind_macros::{TupleLike, entry, function};
use stackbind_registry::{RegistrationTable, Registry};
use thiserror::Error;

/// Failures reported to scripts as runtime errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("attempt to perform 'n//0'")]
    DivisionByZero,

    #[error("number has no integer representation")]
    NotRepresentable,

    #[error("integer overflow")]
    Overflow,
}

/// A 2D vector, exchanged with scripts as `{x, y}`.
#[derive(Debug, Clone, Copy, PartialEq, TupleLike)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

// =============================================================================
// ROUNDING
// =============================================================================

/// Largest integer not greater than `x`.
#[function]
pub fn floor(x: f64) -> Result<i64, MathError> {
    to_integer(x.floor())
}

/// Smallest integer not less than `x`.
#[function]
pub fn ceil(x: f64) -> Result<i64, MathError> {
    to_integer(x.ceil())
}

fn to_integer(x: f64) -> Result<i64, MathError> {
    const END: f64 = 9_223_372_036_854_775_808.0;
    if x.is_finite() && (-END..END).contains(&x) {
        Ok(x as i64)
    } else {
        Err(MathError::NotRepresentable)
    }
}

// =============================================================================
// ARITHMETIC
// =============================================================================

/// Floor division and modulo, returned as two results.
#[function]
pub fn divmod(a: i64, b: i64) -> Result<Embedded<(i64, i64)>, MathError> {
    let (Some(quotient), Some(remainder)) = (a.checked_div_euclid(b), a.checked_rem_euclid(b))
    else {
        return Err(if b == 0 {
            MathError::DivisionByZero
        } else {
            MathError::NotRepresentable
        });
    };
    // Floor semantics: the remainder takes the sign of the divisor.
    if remainder != 0 && b < 0 {
        Ok(Embedded((quotient - 1, remainder + b)))
    } else {
        Ok(Embedded((quotient, remainder)))
    }
}

/// Restrict `value` to `[min, max]`.
#[function(defaults(0.0, 1.0))]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[function(defaults(0.5))]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Add `step` to `value` in place; the script receives the new value.
#[function(defaults(1))]
pub fn increment(value: &mut i64, step: i64) -> Result<(), MathError> {
    *value = value.checked_add(step).ok_or(MathError::Overflow)?;
    Ok(())
}

// =============================================================================
// SEQUENCES
// =============================================================================

#[function]
pub fn sum(values: ArrayView<f64>) -> Result<f64, ConversionError> {
    values.iter().sum()
}

/// Smallest and largest element, or two nils for an empty sequence.
#[function]
pub fn minmax(
    values: ArrayView<f64>,
) -> Result<Embedded<(Option<f64>, Option<f64>)>, ConversionError> {
    let mut bounds: Option<(f64, f64)> = None;
    for v in &values {
        let v = v?;
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    Ok(Embedded((bounds.map(|b| b.0), bounds.map(|b| b.1))))
}

// =============================================================================
// VECTORS
// =============================================================================

#[function(defaults(0.0))]
pub fn polar(radius: f64, angle: f64) -> Vec2 {
    Vec2 {
        x: radius * angle.cos(),
        y: radius * angle.sin(),
    }
}

#[function]
pub fn length(v: &Vec2) -> f64 {
    v.x.hypot(v.y)
}

/// Components of `v` as two results.
#[function]
pub fn unpack(v: Vec2) -> Embedded<Vec2> {
    Embedded(v)
}

// =============================================================================
// MODULE CREATION
// =============================================================================

/// Functions exposed through generated entry points, plus integer limits.
pub const TABLE: RegistrationTable = RegistrationTable::new(
    &[
        ("floor", entry!(floor)),
        ("ceil", entry!(ceil)),
        ("divmod", entry!(divmod)),
        ("clamp", entry!(clamp)),
        ("lerp", entry!(lerp)),
        ("increment", entry!(increment)),
        ("sum", entry!(sum)),
        ("minmax", entry!(minmax)),
        ("polar", entry!(polar)),
        ("length", entry!(length)),
        ("unpack", entry!(unpack)),
    ],
    &[("MAX_INTEGER", i64::MAX), ("MIN_INTEGER", i64::MIN)],
);

/// The math table plus standard library functions wrapped as-is.
pub fn registry() -> Registry {
    Registry::new()
        .table(&TABLE)
        .function("abs", f64::abs)
        .function("sqrt", f64::sqrt)
        .function("max", f64::max)
        .function("min", f64::min)
        .function_with_defaults("round", round_to, (0u32,))
}

/// Round to `digits` decimal places.
fn round_to(x: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits.min(15) as i32);
    (x * scale).round() / scale
}
