//! Release projection for vesting grants

use crescendo_common::{Address, Amount, Timestamp};
use crescendo_treasury::VestingGrant;

use crate::queue::PendingRelease;

/// Total claimable across `grants` at `now`
pub fn claimable(grants: &[VestingGrant], now: Timestamp) -> Amount {
    grants
        .iter()
        .filter_map(|grant| grant.releasable_at(now).ok())
        .fold(0, |acc: Amount, amount| acc.saturating_add(amount))
}

/// Aggregate accrual rate at `now`, fixed units per second
///
/// Sums `total / window` across grants actively vesting at `now`.
/// Dormant and finished grants contribute nothing.
pub fn accrual_rate(grants: &[VestingGrant], now: Timestamp) -> Amount {
    grants
        .iter()
        .filter(|grant| grant.start <= now && now < grant.end)
        .fold(0, |acc: Amount, grant| {
            let window = (grant.end - grant.start) as u128;
            acc.saturating_add(grant.total / window)
        })
}

/// Project when `beneficiary`'s claimable balance next crosses `dust`
///
/// The projection extrapolates the current accrual rate, so a schedule
/// ending before the crossing lands the estimate early or late; the
/// keeper re-projects every sweep, which corrects any drift.
pub fn project_release(
    beneficiary: Address,
    grants: &[VestingGrant],
    now: Timestamp,
    dust: Amount,
) -> Option<PendingRelease> {
    if grants.is_empty() {
        return None;
    }

    let here = claimable(grants, now);
    if here > 0 && here >= dust {
        return Some(PendingRelease {
            beneficiary,
            due: now,
            amount: here,
        });
    }

    let rate = accrual_rate(grants, now);
    if rate > 0 {
        let deficit = dust.saturating_sub(here);
        let eta = deficit.saturating_add(rate - 1) / rate;
        let due = now.saturating_add(eta.min(u64::MAX as u128) as u64);
        return Some(PendingRelease {
            beneficiary,
            due,
            amount: claimable(grants, due),
        });
    }

    // Nothing accruing. A dormant remainder below the dust threshold
    // will never grow, so sweep it; otherwise wait out a future start.
    if here > 0 {
        return Some(PendingRelease {
            beneficiary,
            due: now,
            amount: here,
        });
    }
    let next_start = grants
        .iter()
        .filter(|grant| grant.start > now)
        .map(|grant| grant.start)
        .min()?;
    Some(PendingRelease {
        beneficiary,
        due: next_start,
        amount: claimable(grants, next_start),
    })
}
