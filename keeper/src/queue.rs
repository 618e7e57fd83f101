//! Priority queue for pending releases (min-heap by due time)

use crescendo_common::{Address, Amount, Timestamp};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Projected release for one beneficiary
#[derive(Debug, Clone)]
pub struct PendingRelease {
    /// Beneficiary address
    pub beneficiary: Address,
    /// When the claimable balance next crosses the dust threshold
    pub due: Timestamp,
    /// Claimable amount projected at that instant
    pub amount: Amount,
}

impl PendingRelease {
    /// Check if this release is worth sweeping at `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due <= now
    }
}

/// Due-time priority queue (min-heap: earliest release first)
pub struct ReleaseQueue {
    /// Priority queue (using Reverse for min-heap)
    queue: PriorityQueue<Address, Reverse<Timestamp>>,
    /// Map for O(1) lookups
    map: HashMap<Address, PendingRelease>,
}

impl ReleaseQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            map: HashMap::new(),
        }
    }

    /// Push or update a beneficiary's projected release
    pub fn push(&mut self, release: PendingRelease) {
        let beneficiary = release.beneficiary;
        let due = release.due;

        // Update map
        self.map.insert(beneficiary, release);

        // Update priority queue (using Reverse for min-heap)
        self.queue.push(beneficiary, Reverse(due));
    }

    /// Pop the earliest-due release
    pub fn pop(&mut self) -> Option<PendingRelease> {
        let (beneficiary, _priority) = self.queue.pop()?;
        self.map.remove(&beneficiary)
    }

    /// Peek at the earliest-due release without removing
    pub fn peek(&self) -> Option<&PendingRelease> {
        let (beneficiary, _priority) = self.queue.peek()?;
        self.map.get(beneficiary)
    }

    /// Remove a beneficiary from the queue
    pub fn remove(&mut self, beneficiary: &Address) -> Option<PendingRelease> {
        self.queue.remove(beneficiary);
        self.map.remove(beneficiary)
    }

    /// Get a beneficiary's projected release
    pub fn get(&self, beneficiary: &Address) -> Option<&PendingRelease> {
        self.map.get(beneficiary)
    }

    /// Check if queue contains a beneficiary
    pub fn contains(&self, beneficiary: &Address) -> bool {
        self.map.contains_key(beneficiary)
    }

    /// Get number of pending releases
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get every release already due at `now`
    pub fn get_due(&self, now: Timestamp) -> Vec<PendingRelease> {
        self.map
            .values()
            .filter(|release| release.is_due(now))
            .cloned()
            .collect()
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.queue.clear();
        self.map.clear();
    }
}

impl Default for ReleaseQueue {
    fn default() -> Self {
        Self::new()
    }
}
