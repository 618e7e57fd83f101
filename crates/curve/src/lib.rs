//! Bonding-curve pricing for the crescendo token sale
//!
//! Fixed-point arithmetic (18 implied decimals) and the piecewise
//! linear/logarithmic issuance curve with its discount bonus.

pub mod math;
pub mod pricing;

// Re-export the surface the treasury and keeper use
pub use math::{FIXED_ONE, LN_1_5};
pub use pricing::{
    compute_bonus, compute_tokens, CURVE_THRESHOLD, LINEAR_RATE_DEN, LINEAR_RATE_NUM,
    LOG_BASE_OFFSET, LOG_SCALE_K, SMALL_CONTRIBUTION_CUTOFF,
};
