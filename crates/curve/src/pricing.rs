//! Piecewise bonding-curve issuance
//!
//! Below a fixed raise threshold, contributions buy tokens at a flat
//! rate. Above it, issuance follows the integral of K/x, so each
//! marginal unit buys fewer tokens as the raise deepens:
//!
//!   tokens = K · (ln(T + raised' + contribution') - ln(T + raised'))
//!
//! where the primed quantities count only the amounts above the
//! threshold. Small above-threshold slices take a trapezoidal shortcut
//! instead of two series logarithms, which are noisier than the
//! shortcut at small magnitudes.

use crescendo_common::CrescendoError;

use crate::math::{self, FIXED_ONE};

/// Raise threshold separating the linear and logarithmic regimes
/// (7,000,000 currency units, fixed units).
pub const CURVE_THRESHOLD: u128 = 7_000_000 * FIXED_ONE;

/// Base offset inside the logarithm; equal to the threshold, keeping the
/// argument away from ln(0).
pub const LOG_BASE_OFFSET: u128 = 7_000_000 * FIXED_ONE;

/// Issuance scale of the logarithmic regime, in whole tokens.
pub const LOG_SCALE_K: u128 = 70_000_000;

/// Linear regime price: 100/14 tokens per currency unit.
pub const LINEAR_RATE_NUM: u128 = 100;
pub const LINEAR_RATE_DEN: u128 = 14;

/// Above-threshold slices below this take the trapezoid shortcut.
pub const SMALL_CONTRIBUTION_CUTOFF: u128 = 50_000 * FIXED_ONE;

/// Tokens issued for `contribution` given `raised` already collected.
/// Both are fixed units; so is the result.
pub fn compute_tokens(raised: u128, contribution: u128) -> Result<u128, CrescendoError> {
    if contribution == 0 {
        return Err(CrescendoError::InvalidAmount);
    }

    let after = math::add(raised, contribution)?;

    // Entirely below the threshold: flat rate, exact integer math
    if after <= CURVE_THRESHOLD {
        return linear_tokens(contribution);
    }

    // Entirely above: the whole contribution rides the curve
    if raised >= CURVE_THRESHOLD {
        return log_tokens(raised - CURVE_THRESHOLD, contribution);
    }

    // Straddling: price each side in its own regime
    let below = CURVE_THRESHOLD - raised;
    let above = after - CURVE_THRESHOLD;
    math::add(linear_tokens(below)?, log_tokens(0, above)?)
}

/// Discounted issuance: `amount * 100 / discount_base`. A lower base
/// yields strictly more tokens; 100 is par, 70 the deepest discount.
pub fn compute_bonus(amount: u128, discount_base: u8) -> Result<u128, CrescendoError> {
    if !(70..=100).contains(&discount_base) {
        return Err(CrescendoError::InvalidDiscount);
    }
    math::mul_div(amount, 100, discount_base as u128)
}

fn linear_tokens(contribution: u128) -> Result<u128, CrescendoError> {
    math::mul_div(contribution, LINEAR_RATE_NUM, LINEAR_RATE_DEN)
}

/// Curve issuance for the slice above the threshold. `raised_above` and
/// `contribution_above` count only above-threshold amounts.
fn log_tokens(raised_above: u128, contribution_above: u128) -> Result<u128, CrescendoError> {
    if contribution_above == 0 {
        return Ok(0);
    }
    let lower = math::add(LOG_BASE_OFFSET, raised_above)?;
    let upper = math::add(lower, contribution_above)?;

    if contribution_above < SMALL_CONTRIBUTION_CUTOFF {
        trapezoid_tokens(lower, upper, contribution_above)
    } else {
        series_tokens(lower, upper)
    }
}

/// Trapezoid rule over [lower, upper]:
///
///   tokens ≈ K · (1/lower + 1/upper) · width / 2
fn trapezoid_tokens(lower: u128, upper: u128, width: u128) -> Result<u128, CrescendoError> {
    let inv_sum = math::add(math::div(FIXED_ONE, lower)?, math::div(FIXED_ONE, upper)?)?;
    let area = math::mul(inv_sum, width)?;
    math::mul_div(area, LOG_SCALE_K, 2)
}

/// Series form: K · (ln(upper) - ln(lower)).
fn series_tokens(lower: u128, upper: u128) -> Result<u128, CrescendoError> {
    let delta = math::sub(math::ln(upper)?, math::ln(lower)?)?;
    delta
        .checked_mul(LOG_SCALE_K)
        .ok_or(CrescendoError::ArithmeticOverflow)
}
