//! In-memory collaborator implementations.
//!
//! These back the keeper binary and every test layer. A production host
//! substitutes adapters over its real token plumbing.

use std::collections::{HashMap, HashSet};

use crate::ledger::{AllowList, TokenLedger};
use crate::types::{Address, Amount};

/// Balance map with a designated treasury account that `transfer` and
/// `burn` spend from.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    treasury: Address,
    balances: HashMap<Address, Amount>,
}

impl InMemoryLedger {
    pub fn new(treasury: Address) -> Self {
        Self {
            treasury,
            balances: HashMap::new(),
        }
    }

    /// Credit an account directly (sale funding, test setup).
    pub fn mint(&mut self, to: &Address, amount: Amount) {
        let entry = self.balances.entry(*to).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn treasury(&self) -> &Address {
        &self.treasury
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, addr: &Address) -> Amount {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    fn transfer(&mut self, to: &Address, amount: Amount) -> bool {
        let held = self.balance_of(&self.treasury);
        if held < amount {
            return false;
        }
        self.balances.insert(self.treasury, held - amount);
        let entry = self.balances.entry(*to).or_insert(0);
        *entry = entry.saturating_add(amount);
        true
    }

    fn burn(&mut self, amount: Amount) -> bool {
        let held = self.balance_of(&self.treasury);
        if held < amount {
            return false;
        }
        self.balances.insert(self.treasury, held - amount);
        true
    }
}

/// Fixed-membership allow-list.
#[derive(Debug, Clone, Default)]
pub struct StaticAllowList {
    members: HashSet<Address>,
}

impl StaticAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, addr: Address) {
        self.members.insert(addr);
    }

    pub fn revoke(&mut self, addr: &Address) {
        self.members.remove(addr);
    }
}

impl AllowList for StaticAllowList {
    fn is_allowed(&self, addr: &Address) -> bool {
        self.members.contains(addr)
    }
}
