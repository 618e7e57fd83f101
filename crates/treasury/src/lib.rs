//! Treasury ledgers for the crescendo token distribution
//!
//! Three owned state machines over the shared collaborator traits: the
//! sale (pricing, cap, allow-list), the vesting ledger (linear grants
//! and incremental claims), and the escrow ledger (arbitrated holds).
//! Every call is run-to-completion and all-or-nothing; hosts serialize
//! access by owning each ledger behind `&mut`.

#![allow(clippy::too_many_arguments)]

pub mod escrow;
pub mod sale;
pub mod vesting;

pub use escrow::{EscrowLedger, EscrowLock};
pub use sale::{RaisedState, Sale, MIN_CONTRIBUTION};
pub use vesting::{VestingGrant, VestingLedger};
