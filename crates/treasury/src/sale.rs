//! Sale orchestration
//!
//! Gates a contribution through the allow-list and minimum, prices it
//! on the curve, applies the discount, enforces the hard cap, and hands
//! the tokens to the vesting ledger. Either every step lands or none
//! does.

use crescendo_common::{
    display_address, Address, AllowList, Amount, CrescendoError, Event, EventLog, Timestamp,
    TokenLedger,
};
use crescendo_curve::{compute_bonus, compute_tokens, FIXED_ONE};

use crate::vesting::VestingLedger;

/// Smallest accepted contribution: 10 currency units.
pub const MIN_CONTRIBUTION: Amount = 10 * FIXED_ONE;

/// Funds collected and tokens issued so far. `sold_tokens` stays
/// strictly below `hard_cap`; `raised` only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaisedState {
    pub raised: Amount,
    pub sold_tokens: Amount,
    pub hard_cap: Amount,
}

/// One sale. Owns its raise counters; vesting and the allow-list are
/// collaborators threaded into each purchase.
#[derive(Debug)]
pub struct Sale {
    operator: Address,
    state: RaisedState,
    finalized: bool,
}

impl Sale {
    pub fn new(operator: Address, hard_cap: Amount) -> Self {
        Self {
            operator,
            state: RaisedState {
                raised: 0,
                sold_tokens: 0,
                hard_cap,
            },
            finalized: false,
        }
    }

    pub fn state(&self) -> &RaisedState {
        &self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Accept a contribution and grant the purchased tokens to vest
    /// linearly over `[now, now + vesting_duration]`.
    ///
    /// Returns the token amount granted, discount included.
    pub fn purchase(
        &mut self,
        beneficiary: Address,
        contribution: Amount,
        discount_base: u8,
        vesting_duration: u64,
        now: Timestamp,
        allow_list: &impl AllowList,
        vesting: &mut VestingLedger,
        events: &mut EventLog,
    ) -> Result<Amount, CrescendoError> {
        if self.finalized {
            return Err(CrescendoError::Unauthorized);
        }
        if !allow_list.is_allowed(&beneficiary) {
            return Err(CrescendoError::Unauthorized);
        }
        if contribution < MIN_CONTRIBUTION {
            return Err(CrescendoError::InvalidAmount);
        }

        let raw = compute_tokens(self.state.raised, contribution)?;
        let tokens = compute_bonus(raw, discount_base)?;
        if tokens == 0 {
            // A raise deep enough that the contribution buys nothing
            return Err(CrescendoError::InvalidAmount);
        }

        let new_sold = self
            .state
            .sold_tokens
            .checked_add(tokens)
            .ok_or(CrescendoError::ArithmeticOverflow)?;
        if new_sold >= self.state.hard_cap {
            return Err(CrescendoError::HardCapExceeded);
        }
        let new_raised = self
            .state
            .raised
            .checked_add(contribution)
            .ok_or(CrescendoError::ArithmeticOverflow)?;
        let end = now
            .checked_add(vesting_duration)
            .ok_or(CrescendoError::ArithmeticOverflow)?;

        // Last fallible step; the counters commit only after it lands
        vesting.grant(beneficiary, tokens, now, end, events)?;
        self.state.raised = new_raised;
        self.state.sold_tokens = new_sold;

        log::info!(
            "purchase: {} buys {tokens} tokens for {contribution} ({} sold of {})",
            display_address(&beneficiary),
            new_sold,
            self.state.hard_cap
        );
        events.record(Event::NewBuyer {
            beneficiary,
            contribution,
            tokens,
        });
        Ok(tokens)
    }

    /// Close the sale: burn the unsold remainder from the treasury
    /// holding and refuse all further purchases. Operator only.
    ///
    /// Returns the amount burned.
    pub fn finalize(
        &mut self,
        caller: Address,
        token: &mut impl TokenLedger,
    ) -> Result<Amount, CrescendoError> {
        if caller != self.operator {
            return Err(CrescendoError::Unauthorized);
        }
        if self.finalized {
            return Err(CrescendoError::AlreadyExists);
        }

        let unsold = self.state.hard_cap.saturating_sub(self.state.sold_tokens);
        if unsold > 0 && !token.burn(unsold) {
            return Err(CrescendoError::TransferFailed);
        }

        self.finalized = true;
        log::info!(
            "sale finalized: {} sold, {unsold} burned",
            self.state.sold_tokens
        );
        Ok(unsold)
    }
}
