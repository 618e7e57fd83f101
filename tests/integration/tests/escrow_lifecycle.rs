//! Escrow lifecycle scenarios
//!
//! Multi-step settlement paths over the escrow ledger: arbitrated
//! release, reclamation after expiry, mediation, and parallel locks
//! spending from one treasury. Every path is checked for conservation:
//! tokens only move between the treasury and the named parties.

use crescendo_common::{
    Address, Amount, CrescendoError, Event, EventLog, InMemoryLedger, TokenLedger,
};
use crescendo_treasury::EscrowLedger;

const ONE: Amount = 1_000_000_000_000_000_000;
const TREASURY: Address = [0xff; 20];
const ARBITRATOR: Address = [0xaa; 20];
const SENDER: Address = [0x51; 20];
const RECIPIENT: Address = [0x52; 20];

/// Create, fund, release: the canonical happy path with a fee.
#[test]
fn test_escrow_settlement_end_to_end() {
    println!("========================================");
    println!("Escrow settlement: create, fund, release");
    println!("========================================");

    let mut escrow = EscrowLedger::new(TREASURY);
    let mut token = InMemoryLedger::new(TREASURY);
    let mut events = EventLog::new();
    token.mint(&TREASURY, 103 * ONE);

    // Terms: 100 principal, 3 fee, reclaim window closes at t=2000
    escrow
        .create(ARBITRATOR, 7, SENDER, RECIPIENT, 100 * ONE, 3 * ONE, 2_000, &mut events)
        .unwrap();
    println!("Lock 7 created");

    // Nothing settles before funding confirms
    assert_eq!(
        escrow.release(ARBITRATOR, 7, SENDER, RECIPIENT, 250, &mut token, &mut events),
        Err(CrescendoError::NotPaid)
    );

    escrow.fund(ARBITRATOR, 7, SENDER, 100 * ONE, 3 * ONE, &mut events).unwrap();
    println!("Lock 7 funded");

    // Arbitrated settlement at an off-chain rate of 250
    escrow
        .release(ARBITRATOR, 7, SENDER, RECIPIENT, 250, &mut token, &mut events)
        .unwrap();
    println!("Lock 7 released");

    assert_eq!(token.balance_of(&RECIPIENT), 100 * ONE);
    assert_eq!(token.balance_of(&ARBITRATOR), 3 * ONE);
    assert_eq!(token.balance_of(&TREASURY), 0);
    assert!(escrow.lock(&ARBITRATOR, 7).is_none(), "settled lock is deleted");

    let drained = events.drain();
    assert_eq!(drained.len(), 3);
    assert!(matches!(drained[0], Event::Created { tx_id: 7, .. }));
    assert!(matches!(drained[1], Event::Paid { tx_id: 7, .. }));
    assert!(matches!(
        drained[2],
        Event::Released { tx_id: 7, exchange_rate: 250, fee, .. } if fee == 3 * ONE
    ));

    println!("========================================");
    println!("Escrow settlement passed");
    println!("========================================");
}

/// The sender waits out the time box and takes everything back.
#[test]
fn test_escrow_reclaim_after_expiry() {
    println!("========================================");
    println!("Escrow reclaim after expiry");
    println!("========================================");

    let mut escrow = EscrowLedger::new(TREASURY);
    let mut token = InMemoryLedger::new(TREASURY);
    let mut events = EventLog::new();
    token.mint(&TREASURY, 55 * ONE);

    escrow
        .create(ARBITRATOR, 1, SENDER, RECIPIENT, 50 * ONE, 5 * ONE, 5_000, &mut events)
        .unwrap();
    escrow.fund(ARBITRATOR, 1, SENDER, 50 * ONE, 5 * ONE, &mut events).unwrap();

    // The deadline itself is still inside the window
    assert_eq!(
        escrow.claim(ARBITRATOR, 1, SENDER, 5_000, &mut token),
        Err(CrescendoError::NotExpired)
    );

    // One tick past the deadline the full amount comes back, fee included
    escrow.claim(ARBITRATOR, 1, SENDER, 5_001, &mut token).unwrap();
    println!("Sender reclaimed after expiry");

    assert_eq!(token.balance_of(&SENDER), 55 * ONE);
    assert_eq!(token.balance_of(&TREASURY), 0);
    assert!(escrow.lock(&ARBITRATOR, 1).is_none());

    // Reclamation leaves no event of its own behind
    let drained = events.drain();
    assert_eq!(drained.len(), 2);
    assert!(matches!(drained[0], Event::Created { .. }));
    assert!(matches!(drained[1], Event::Paid { .. }));

    println!("========================================");
    println!("Escrow reclaim passed");
    println!("========================================");
}

/// Mediation freezes the sender out; the arbitrator still settles.
#[test]
fn test_escrow_dispute_then_settlement() {
    println!("========================================");
    println!("Escrow dispute and settlement");
    println!("========================================");

    let mut escrow = EscrowLedger::new(TREASURY);
    let mut token = InMemoryLedger::new(TREASURY);
    let mut events = EventLog::new();
    token.mint(&TREASURY, 20 * ONE);

    escrow
        .create(ARBITRATOR, 3, SENDER, RECIPIENT, 20 * ONE, 0, 5_000, &mut events)
        .unwrap();
    escrow.fund(ARBITRATOR, 3, SENDER, 20 * ONE, 0, &mut events).unwrap();

    // Recipient raises a dispute before the window closes
    escrow.mediate(ARBITRATOR, 3, &mut events).unwrap();
    println!("Lock 3 under mediation");

    // However long the sender waits, reclamation stays closed
    assert_eq!(
        escrow.claim(ARBITRATOR, 3, SENDER, 999_999, &mut token),
        Err(CrescendoError::ZeroExpiration)
    );
    assert_eq!(
        escrow.claim(ARBITRATOR, 3, SENDER, u64::MAX, &mut token),
        Err(CrescendoError::ZeroExpiration)
    );

    // A repeated dispute changes nothing and emits nothing
    let before = events.len();
    escrow.mediate(ARBITRATOR, 3, &mut events).unwrap();
    assert_eq!(events.len(), before);

    // The arbitrator rules for the recipient
    escrow
        .release(ARBITRATOR, 3, SENDER, RECIPIENT, 0, &mut token, &mut events)
        .unwrap();
    println!("Arbitrator settled the dispute");

    assert_eq!(token.balance_of(&RECIPIENT), 20 * ONE);
    assert_eq!(token.balance_of(&SENDER), 0);

    let drained = events.drain();
    assert_eq!(drained.len(), 4);
    assert!(matches!(drained[2], Event::Dispute { tx_id: 3, .. }));
    assert!(matches!(drained[3], Event::Released { tx_id: 3, .. }));

    println!("========================================");
    println!("Escrow dispute passed");
    println!("========================================");
}

/// Two locks under different arbitrators share one treasury and settle
/// independently; value is conserved across both paths.
#[test]
fn test_escrow_parallel_locks_share_one_treasury() {
    println!("========================================");
    println!("Parallel escrow locks");
    println!("========================================");

    let other_arbitrator: Address = [0xab; 20];
    let other_sender: Address = [0x61; 20];

    let mut escrow = EscrowLedger::new(TREASURY);
    let mut token = InMemoryLedger::new(TREASURY);
    let mut events = EventLog::new();
    let total = 30 * ONE + 2 * ONE + 40 * ONE;
    token.mint(&TREASURY, total);

    // Same transaction id, different arbitrators: two distinct locks
    escrow
        .create(ARBITRATOR, 9, SENDER, RECIPIENT, 30 * ONE, 2 * ONE, 1_000, &mut events)
        .unwrap();
    escrow
        .create(other_arbitrator, 9, other_sender, RECIPIENT, 40 * ONE, 0, 1_000, &mut events)
        .unwrap();
    escrow.fund(ARBITRATOR, 9, SENDER, 30 * ONE, 2 * ONE, &mut events).unwrap();
    escrow.fund(other_arbitrator, 9, other_sender, 40 * ONE, 0, &mut events).unwrap();
    println!("Two locks funded under tx id 9");

    // First settles to the recipient, second expires back to its sender
    escrow
        .release(ARBITRATOR, 9, SENDER, RECIPIENT, 0, &mut token, &mut events)
        .unwrap();
    escrow.claim(other_arbitrator, 9, other_sender, 1_001, &mut token).unwrap();
    println!("One released, one reclaimed");

    assert_eq!(token.balance_of(&RECIPIENT), 30 * ONE);
    assert_eq!(token.balance_of(&ARBITRATOR), 2 * ONE);
    assert_eq!(token.balance_of(&other_sender), 40 * ONE);
    assert_eq!(token.balance_of(&TREASURY), 0);
    assert_eq!(
        token.balance_of(&RECIPIENT)
            + token.balance_of(&ARBITRATOR)
            + token.balance_of(&other_sender),
        total,
        "every token minted is accounted for"
    );
    assert!(escrow.lock(&ARBITRATOR, 9).is_none());
    assert!(escrow.lock(&other_arbitrator, 9).is_none());

    println!("========================================");
    println!("Parallel escrow locks passed");
    println!("========================================");
}
