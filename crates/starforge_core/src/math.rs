//! Integer and fixed-point helpers for deterministic simulation.
//!
//! Build progress never touches floating point. Ratios are expressed as
//! fixed-point numbers so every client computes the same percentages.

use fixed::types::I32F32;

/// Fixed-point number type for ratios.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Integer division rounding up, for a positive divisor.
///
/// A non-positive divisor is treated as 1.
#[must_use]
pub const fn ceil_div(numerator: i32, divisor: i32) -> i32 {
    let divisor = if divisor < 1 { 1 } else { divisor };
    if numerator <= 0 {
        return 0;
    }
    (numerator - 1) / divisor + 1
}

/// `part / whole` clamped to `[0, 1]`.
///
/// A non-positive `whole` counts as already full.
#[must_use]
pub fn ratio(part: i32, whole: i32) -> Fixed {
    if whole <= 0 {
        return Fixed::ONE;
    }
    let part = part.clamp(0, whole);
    Fixed::from_num(part) / Fixed::from_num(whole)
}
