//! Shared kernel for the crescendo token-distribution ledgers
//!
//! Scalar types, the error taxonomy, the event log, and the collaborator
//! traits every ledger is built against. No ledger logic lives here.

pub mod error;
pub mod event;
pub mod ledger;
pub mod mem;
pub mod types;

// Re-export the types the ledger crates use on every signature
pub use error::CrescendoError;
pub use event::{Event, EventLog, MAX_EVENTS};
pub use ledger::{AllowList, Clock, SystemClock, TokenLedger};
pub use mem::{InMemoryLedger, StaticAllowList};
pub use types::{display_address, Address, Amount, Timestamp, TransactionId};
