//! Overflow-checked fixed-point arithmetic (18 implied decimals)
//!
//! All values are unsigned integers scaled by 10^18. Operations fail
//! instead of wrapping or saturating: money math propagates errors.

use crescendo_common::CrescendoError;

/// One whole unit in fixed-point representation (1e18)
pub const FIXED_ONE: u128 = 1_000_000_000_000_000_000;

/// ln(1.5) in fixed units, accumulated per range-reduction step in [`ln`]
pub const LN_1_5: u128 = 405_465_108_108_164_000;

/// Terms evaluated for the ln(1 + y) series. The residual is bounded by
/// 0.5, so the dropped tail stays under ~3e-5 in absolute terms, which
/// keeps ln itself within 0.001% relative error at the million-unit
/// magnitudes the pricing curve feeds it.
const LN_SERIES_TERMS: i128 = 10;

/// Checked addition.
pub fn add(a: u128, b: u128) -> Result<u128, CrescendoError> {
    a.checked_add(b).ok_or(CrescendoError::ArithmeticOverflow)
}

/// Checked subtraction; going below zero is an underflow.
pub fn sub(a: u128, b: u128) -> Result<u128, CrescendoError> {
    a.checked_sub(b).ok_or(CrescendoError::ArithmeticUnderflow)
}

/// Fixed-point multiply: (a * b) / FIXED_ONE, truncating.
pub fn mul(a: u128, b: u128) -> Result<u128, CrescendoError> {
    let wide = a.checked_mul(b).ok_or(CrescendoError::ArithmeticOverflow)?;
    Ok(wide / FIXED_ONE)
}

/// Fixed-point divide: (a * FIXED_ONE) / b, truncating. A zero divisor
/// is as unrepresentable as an overflow and reports the same way.
pub fn div(a: u128, b: u128) -> Result<u128, CrescendoError> {
    a.checked_mul(FIXED_ONE)
        .ok_or(CrescendoError::ArithmeticOverflow)?
        .checked_div(b)
        .ok_or(CrescendoError::ArithmeticOverflow)
}

/// (a * b) / den on raw integers, for call sites that would overflow by
/// scaling too early.
pub fn mul_div(a: u128, b: u128, den: u128) -> Result<u128, CrescendoError> {
    a.checked_mul(b)
        .ok_or(CrescendoError::ArithmeticOverflow)?
        .checked_div(den)
        .ok_or(CrescendoError::ArithmeticOverflow)
}

/// Natural logarithm of `x` in fixed units, defined for `x >= 1.0`.
///
/// Range reduction: divide by 1.5 until the mantissa lands in [1, 1.5),
/// accumulating k·ln(1.5). Residual: with y = mantissa - 1 in [0, 0.5),
///
///   ln(1 + y) = y - y²/2 + y³/3 - y⁴/4 + …
///
/// truncated after [`LN_SERIES_TERMS`] terms. Arguments below one would
/// need a signed result and are rejected with `ArithmeticUnderflow`.
pub fn ln(x: u128) -> Result<u128, CrescendoError> {
    if x < FIXED_ONE {
        return Err(CrescendoError::ArithmeticUnderflow);
    }

    // x / 1.5 == x * 2 / 3 in fixed units
    let threshold = FIXED_ONE + FIXED_ONE / 2;
    let mut mantissa = x;
    let mut steps: u128 = 0;
    while mantissa >= threshold {
        mantissa = mantissa
            .checked_mul(2)
            .ok_or(CrescendoError::ArithmeticOverflow)?
            / 3;
        steps += 1;
    }

    let base = LN_1_5
        .checked_mul(steps)
        .ok_or(CrescendoError::ArithmeticOverflow)?;

    // Alternating series on the residual. Operands stay below 1.5e18 so
    // plain i128 products cannot overflow.
    let one = FIXED_ONE as i128;
    let y = (mantissa - FIXED_ONE) as i128;
    let mut power = y;
    let mut sum = y;
    for n in 2..=LN_SERIES_TERMS {
        power = power * y / one;
        let term = power / n;
        if n % 2 == 0 {
            sum -= term;
        } else {
            sum += term;
        }
    }

    // The partial sum is non-negative for y in [0, 0.5)
    add(base, sum as u128)
}
