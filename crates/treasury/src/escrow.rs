//! Escrowed token holds between counterparties
//!
//! Each lock is keyed by the arbitrating principal and a transaction
//! id. The machine is Empty -> Created -> Funded -> {Released |
//! Reclaimed}. Mediation freezes a funded lock by zeroing its
//! expiration, after which only the arbitrator can settle it.

use std::collections::HashMap;

use crescendo_common::{
    display_address, Address, Amount, CrescendoError, Event, EventLog, Timestamp, TokenLedger,
    TransactionId,
};

/// One escrowed hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowLock {
    pub sender: Address,
    pub recipient: Address,
    /// Principal held for the recipient, fixed units
    pub value: Amount,
    /// Arbitrator compensation paid on release
    pub fee: Amount,
    /// Reclaim deadline. Zero means the sender can never reclaim:
    /// either the lock was created without a time box or an arbitrator
    /// mediated it. The two cases are indistinguishable on purpose and
    /// must stay that way.
    pub expiration: Timestamp,
    /// Funding confirmed
    pub paid: bool,
}

/// Escrow records keyed by `(arbitrator, transaction id)`. Spends from
/// the treasury holding named at construction.
#[derive(Debug)]
pub struct EscrowLedger {
    treasury: Address,
    locks: HashMap<(Address, TransactionId), EscrowLock>,
}

impl EscrowLedger {
    pub fn new(treasury: Address) -> Self {
        Self {
            treasury,
            locks: HashMap::new(),
        }
    }

    /// Open a lock. Only valid on an empty key.
    pub fn create(
        &mut self,
        arbitrator: Address,
        tx_id: TransactionId,
        sender: Address,
        recipient: Address,
        value: Amount,
        fee: Amount,
        expiration: Timestamp,
        events: &mut EventLog,
    ) -> Result<(), CrescendoError> {
        if value == 0 {
            return Err(CrescendoError::InvalidAmount);
        }
        if self.locks.contains_key(&(arbitrator, tx_id)) {
            return Err(CrescendoError::AlreadyExists);
        }

        self.locks.insert(
            (arbitrator, tx_id),
            EscrowLock {
                sender,
                recipient,
                value,
                fee,
                expiration,
                paid: false,
            },
        );

        log::debug!(
            "escrow {tx_id} created under {}: {value} + {fee} fee",
            display_address(&arbitrator)
        );
        events.record(Event::Created {
            arbitrator,
            tx_id,
            sender,
            recipient,
            value,
            fee,
            expiration,
        });
        Ok(())
    }

    /// Confirm funding. The supplied terms must match the stored record
    /// exactly; any shape failure reads the same from outside.
    pub fn fund(
        &mut self,
        arbitrator: Address,
        tx_id: TransactionId,
        sender: Address,
        value: Amount,
        fee: Amount,
        events: &mut EventLog,
    ) -> Result<(), CrescendoError> {
        let lock = self
            .locks
            .get_mut(&(arbitrator, tx_id))
            .ok_or(CrescendoError::Mismatch)?;
        if lock.paid || lock.sender != sender || lock.value != value || lock.fee != fee {
            return Err(CrescendoError::Mismatch);
        }

        lock.paid = true;
        events.record(Event::Paid { arbitrator, tx_id });
        Ok(())
    }

    /// Arbitrator settlement: pay `value` to the supplied recipient and
    /// the fee to the arbitrator, then delete the lock.
    ///
    /// The stored sender must match, and the stored recipient must
    /// match either the supplied recipient or the supplied sender (the
    /// self-release path). The exchange rate is carried into the event
    /// untouched for off-chain settlement accounting.
    pub fn release(
        &mut self,
        arbitrator: Address,
        tx_id: TransactionId,
        sender: Address,
        recipient: Address,
        exchange_rate: u64,
        token: &mut impl TokenLedger,
        events: &mut EventLog,
    ) -> Result<(), CrescendoError> {
        let key = (arbitrator, tx_id);
        let lock = self.locks.get(&key).copied().ok_or(CrescendoError::Mismatch)?;
        if lock.sender != sender || (lock.recipient != recipient && lock.recipient != sender) {
            return Err(CrescendoError::Mismatch);
        }
        if !lock.paid {
            return Err(CrescendoError::NotPaid);
        }

        // Two payouts; check the whole funding requirement up front so
        // a refusal cannot strand a half-settled lock
        let needed = lock
            .value
            .checked_add(lock.fee)
            .ok_or(CrescendoError::ArithmeticOverflow)?;
        if token.balance_of(&self.treasury) < needed {
            return Err(CrescendoError::TransferFailed);
        }
        if !token.transfer(&recipient, lock.value) {
            return Err(CrescendoError::TransferFailed);
        }
        if lock.fee > 0 && !token.transfer(&arbitrator, lock.fee) {
            return Err(CrescendoError::TransferFailed);
        }

        self.locks.remove(&key);
        log::info!(
            "escrow {tx_id} released: {} to {}",
            lock.value,
            display_address(&recipient)
        );
        events.record(Event::Released {
            arbitrator,
            tx_id,
            recipient,
            value: lock.value,
            fee: lock.fee,
            exchange_rate,
        });
        Ok(())
    }

    /// Sender reclamation after the time box lapses: `value + fee` move
    /// back to the sender in one transfer and the lock is deleted. The
    /// lock's disappearance is the only observable record.
    pub fn claim(
        &mut self,
        arbitrator: Address,
        tx_id: TransactionId,
        sender: Address,
        now: Timestamp,
        token: &mut impl TokenLedger,
    ) -> Result<(), CrescendoError> {
        let key = (arbitrator, tx_id);
        let lock = self.locks.get(&key).copied().ok_or(CrescendoError::Mismatch)?;
        if lock.sender != sender {
            return Err(CrescendoError::Mismatch);
        }
        if !lock.paid {
            return Err(CrescendoError::NotPaid);
        }
        if lock.expiration == 0 {
            return Err(CrescendoError::ZeroExpiration);
        }
        if now <= lock.expiration {
            return Err(CrescendoError::NotExpired);
        }

        let refund = lock
            .value
            .checked_add(lock.fee)
            .ok_or(CrescendoError::ArithmeticOverflow)?;
        if !token.transfer(&sender, refund) {
            return Err(CrescendoError::TransferFailed);
        }

        self.locks.remove(&key);
        log::info!(
            "escrow {tx_id} reclaimed by {}: {refund}",
            display_address(&sender)
        );
        Ok(())
    }

    /// Freeze a funded lock: force `expiration = 0` so the sender can
    /// never reclaim it. One-way and idempotent; the event fires only
    /// on the actual transition.
    pub fn mediate(
        &mut self,
        arbitrator: Address,
        tx_id: TransactionId,
        events: &mut EventLog,
    ) -> Result<(), CrescendoError> {
        let lock = self
            .locks
            .get_mut(&(arbitrator, tx_id))
            .ok_or(CrescendoError::Mismatch)?;
        if !lock.paid {
            return Err(CrescendoError::NotPaid);
        }
        if lock.expiration == 0 {
            return Ok(());
        }

        lock.expiration = 0;
        log::info!(
            "escrow {tx_id} under mediation by {}",
            display_address(&arbitrator)
        );
        events.record(Event::Dispute { arbitrator, tx_id });
        Ok(())
    }

    pub fn lock(&self, arbitrator: &Address, tx_id: TransactionId) -> Option<&EscrowLock> {
        self.locks.get(&(*arbitrator, tx_id))
    }
}
