//! Observability events.
//!
//! Every successful state transition appends exactly one record to a
//! host-owned [`EventLog`] threaded into the mutating call. Events never
//! influence behavior; they exist for off-chain indexers and the
//! keeper's export pipeline, which drains each record exactly once.

use serde::Serialize;
use std::collections::VecDeque;

use crate::types::{Address, Amount, Timestamp, TransactionId};

/// Upper bound on buffered events. Oldest records are evicted first; a
/// host that cares about completeness drains more often than it takes
/// ten thousand transitions to occur.
pub const MAX_EVENTS: usize = 10_000;

/// Immutable record of one completed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Escrow lock opened.
    Created {
        #[serde(with = "hex")]
        arbitrator: Address,
        tx_id: TransactionId,
        #[serde(with = "hex")]
        sender: Address,
        #[serde(with = "hex")]
        recipient: Address,
        value: Amount,
        fee: Amount,
        expiration: Timestamp,
    },
    /// Escrow lock funded by its sender.
    Paid {
        #[serde(with = "hex")]
        arbitrator: Address,
        tx_id: TransactionId,
    },
    /// Escrow value paid out by the arbitrator. The exchange rate is
    /// whatever the arbitrator reported; it is not validated.
    Released {
        #[serde(with = "hex")]
        arbitrator: Address,
        tx_id: TransactionId,
        #[serde(with = "hex")]
        recipient: Address,
        value: Amount,
        fee: Amount,
        exchange_rate: u64,
    },
    /// Escrow lock frozen by arbitrator mediation.
    Dispute {
        #[serde(with = "hex")]
        arbitrator: Address,
        tx_id: TransactionId,
    },
    /// Sale accepted a contribution.
    NewBuyer {
        #[serde(with = "hex")]
        beneficiary: Address,
        contribution: Amount,
        tokens: Amount,
    },
    /// Vesting grant recorded.
    NewTokenGrant {
        #[serde(with = "hex")]
        beneficiary: Address,
        amount: Amount,
        start: Timestamp,
        end: Timestamp,
    },
    /// Vested tokens released to their beneficiary.
    NewTokenClaim {
        #[serde(with = "hex")]
        beneficiary: Address,
        amount: Amount,
    },
}

/// Bounded, ordered event sink.
#[derive(Debug, Default)]
pub struct EventLog {
    events: VecDeque<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Append one record, evicting the oldest once the buffer is full.
    pub fn record(&mut self, event: Event) {
        if self.events.len() == MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Hand every buffered record to the host, oldest first. Each record
    /// is returned exactly once.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Inspect buffered records without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
