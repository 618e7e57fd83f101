//! Linear vesting grants and incremental claims
//!
//! Each beneficiary may hold any number of independent grants. A grant
//! releases linearly between `start` and `end` with no cliff; claims
//! pull whatever has accrued since the last claim and move it from the
//! treasury holding in one transfer.

use std::collections::HashMap;

use crescendo_common::{Address, Amount, CrescendoError, Event, EventLog, Timestamp, TokenLedger};

/// One vesting schedule. Never deleted; `claimed` only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingGrant {
    pub beneficiary: Address,
    /// Full allocation, fixed units
    pub total: Amount,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Portion already paid out
    pub claimed: Amount,
}

impl VestingGrant {
    /// Amount vested at `now` under the linear schedule.
    ///
    /// - Before `start`: nothing
    /// - At or after `end` (including `start == end`): everything
    /// - In between: `total * elapsed / window`, truncating
    pub fn vested_at(&self, now: Timestamp) -> Result<Amount, CrescendoError> {
        if now < self.start {
            return Ok(0);
        }
        if now >= self.end || self.end == self.start {
            return Ok(self.total);
        }
        let elapsed = (now - self.start) as u128;
        let window = (self.end - self.start) as u128;
        let vested = self
            .total
            .checked_mul(elapsed)
            .ok_or(CrescendoError::ArithmeticOverflow)?
            / window;
        Ok(vested)
    }

    /// Vested but not yet claimed at `now`.
    pub fn releasable_at(&self, now: Timestamp) -> Result<Amount, CrescendoError> {
        Ok(self.vested_at(now)?.saturating_sub(self.claimed))
    }
}

/// All grants, keyed by beneficiary. Owned by the host and threaded
/// into each call; time always arrives as a parameter.
#[derive(Debug, Default)]
pub struct VestingLedger {
    grants: HashMap<Address, Vec<VestingGrant>>,
}

impl VestingLedger {
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Record a new grant. Grants never merge; a beneficiary
    /// accumulates schedules side by side.
    pub fn grant(
        &mut self,
        beneficiary: Address,
        amount: Amount,
        start: Timestamp,
        end: Timestamp,
        events: &mut EventLog,
    ) -> Result<(), CrescendoError> {
        if amount == 0 {
            return Err(CrescendoError::InvalidAmount);
        }
        if end < start {
            return Err(CrescendoError::InvalidAmount);
        }

        self.grants.entry(beneficiary).or_default().push(VestingGrant {
            beneficiary,
            total: amount,
            start,
            end,
            claimed: 0,
        });

        log::debug!(
            "vesting grant: {} tokens to {} over [{start}, {end}]",
            amount,
            crescendo_common::display_address(&beneficiary)
        );
        events.record(Event::NewTokenGrant {
            beneficiary,
            amount,
            start,
            end,
        });
        Ok(())
    }

    /// Release everything accrued for `beneficiary` up to `now`.
    ///
    /// Computes every grant's releasable first, moves the sum in a
    /// single transfer, and only then advances the `claimed` counters.
    /// A refused transfer leaves the ledger untouched. A zero due
    /// amount is a successful no-op with no transfer and no event.
    pub fn claim(
        &mut self,
        beneficiary: &Address,
        now: Timestamp,
        token: &mut impl TokenLedger,
        events: &mut EventLog,
    ) -> Result<Amount, CrescendoError> {
        let grants = match self.grants.get_mut(beneficiary) {
            Some(grants) => grants,
            None => return Ok(0),
        };

        let mut due: Amount = 0;
        let mut releases = Vec::with_capacity(grants.len());
        for grant in grants.iter() {
            let releasable = grant.releasable_at(now)?;
            due = due
                .checked_add(releasable)
                .ok_or(CrescendoError::ArithmeticOverflow)?;
            releases.push(releasable);
        }

        if due == 0 {
            return Ok(0);
        }

        if !token.transfer(beneficiary, due) {
            return Err(CrescendoError::TransferFailed);
        }

        for (grant, releasable) in grants.iter_mut().zip(releases) {
            grant.claimed = grant.claimed.saturating_add(releasable);
        }

        log::info!(
            "vesting claim: {} tokens released to {}",
            due,
            crescendo_common::display_address(beneficiary)
        );
        events.record(Event::NewTokenClaim {
            beneficiary: *beneficiary,
            amount: due,
        });
        Ok(due)
    }

    /// Claimable right now, without mutating.
    pub fn releasable(
        &self,
        beneficiary: &Address,
        now: Timestamp,
    ) -> Result<Amount, CrescendoError> {
        let mut due: Amount = 0;
        for grant in self.grants_of(beneficiary) {
            due = due
                .checked_add(grant.releasable_at(now)?)
                .ok_or(CrescendoError::ArithmeticOverflow)?;
        }
        Ok(due)
    }

    /// Sum of grant totals for `beneficiary`: allocation bookkeeping,
    /// not the unreleased remainder.
    pub fn total_vested_tokens(&self, beneficiary: &Address) -> Amount {
        self.grants_of(beneficiary)
            .iter()
            .fold(0, |acc: Amount, g| acc.saturating_add(g.total))
    }

    pub fn grants_of(&self, beneficiary: &Address) -> &[VestingGrant] {
        self.grants.get(beneficiary).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn beneficiaries(&self) -> impl Iterator<Item = &Address> {
        self.grants.keys()
    }
}
