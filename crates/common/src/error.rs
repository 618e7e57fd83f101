//! Error taxonomy shared by the pricing curve and the ledgers.
//!
//! Every variant is a hard rejection of the whole call: an operation
//! either commits all of its mutations or none of them, so callers never
//! observe partial state. Retries are a caller decision.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CrescendoError {
    /// Fixed-point result exceeds the representable range (includes
    /// division by zero: the result is equally unrepresentable).
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Unsigned subtraction would go below zero, or `ln` was asked for
    /// an argument under one.
    #[error("arithmetic underflow")]
    ArithmeticUnderflow,

    /// Amount violates a policy bound: zero where a positive value is
    /// required, a contribution under the sale minimum, or an inverted
    /// vesting schedule.
    #[error("invalid amount")]
    InvalidAmount,

    /// Discount base outside the accepted 70..=100 window.
    #[error("invalid discount base")]
    InvalidDiscount,

    /// A record already occupies this key (escrow create), or the sale
    /// is already finalized.
    #[error("already exists")]
    AlreadyExists,

    /// Supplied parties or amounts do not match a stored escrow lock,
    /// or no lock exists at the key.
    #[error("escrow record mismatch")]
    Mismatch,

    /// Sender-side reclaim attempted before the lock's expiration.
    #[error("escrow not yet expired")]
    NotExpired,

    /// Operation requires a funded lock.
    #[error("escrow not funded")]
    NotPaid,

    /// Lock has no expiration: never time-boxed at creation, or frozen
    /// by mediation. Either way the sender cannot reclaim.
    #[error("escrow expiration is zero")]
    ZeroExpiration,

    /// Purchase would push sold tokens to or past the hard cap.
    #[error("hard cap exceeded")]
    HardCapExceeded,

    /// Caller or beneficiary failed an access-control check, or the
    /// sale is closed to purchases.
    #[error("unauthorized")]
    Unauthorized,

    /// The token ledger collaborator refused a transfer or burn.
    #[error("token transfer failed")]
    TransferFailed,
}
