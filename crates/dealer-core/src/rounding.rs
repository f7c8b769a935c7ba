//! # Rounding
//!
//! Half-up rounding by multiply, round, divide. Ties go toward positive
//! infinity (`2.5 → 3`, `-2.5 → -2`), which is what the admin pages have
//! always displayed.

use crate::types::sanitize;

/// Decimal places beyond this are not representable in an f64 anyway.
const MAX_DECIMALS: u32 = 15;

/// Rounds `n` to `decimals` places, half-up.
///
/// ## Example
/// ```rust
/// use dealer_core::rounding::round_to_decimal;
///
/// assert_eq!(round_to_decimal(3.14159, 2), 3.14);
/// assert_eq!(round_to_decimal(2.675, 1), 2.7);
/// ```
pub fn round_to_decimal(n: f64, decimals: u32) -> f64 {
    let n = sanitize(n);
    let factor = 10_f64.powi(decimals.min(MAX_DECIMALS) as i32);
    round_half_up(n * factor) / factor
}

/// Rounds to the nearest whole currency unit (VND has no minor unit).
pub fn round_to_currency(n: f64) -> f64 {
    round_to_decimal(n, 0)
}

/// Measures the fraction against `floor(x)` instead of adding 0.5 first, so
/// values just under a half and integers past 2^52 are not bumped up.
fn round_half_up(x: f64) -> f64 {
    let whole = x.floor();
    if x - whole >= 0.5 {
        whole + 1.0
    } else {
        whole
    }
}
