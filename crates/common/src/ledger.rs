//! Collaborator interfaces.
//!
//! The ledgers never own balances or read wall-clock time. Hosts wire in
//! implementations of these traits; tests and the keeper use the
//! in-memory ones from [`crate::mem`].

use crate::types::{Address, Amount, Timestamp};

/// Token balance bookkeeping, scoped to the treasury's own holding.
///
/// `transfer` and `burn` act on the treasury account, mirroring a token
/// contract invoked by the treasury itself. A `false` return means the
/// ledger refused the operation (typically insufficient balance);
/// callers treat it as a hard failure and abort the whole call.
pub trait TokenLedger {
    fn balance_of(&self, addr: &Address) -> Amount;

    /// Move `amount` from the treasury holding to `to`.
    fn transfer(&mut self, to: &Address, amount: Amount) -> bool;

    /// Destroy `amount` from the treasury holding.
    fn burn(&mut self, amount: Amount) -> bool;
}

/// Purchase eligibility gate for the sale.
pub trait AllowList {
    fn is_allowed(&self, addr: &Address) -> bool;
}

/// Wall-clock source for hosts. Core operations take `now` as an
/// explicit parameter so tests drive time directly; this trait only
/// exists so hosts like the keeper have a seam to mock.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// System-time clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
