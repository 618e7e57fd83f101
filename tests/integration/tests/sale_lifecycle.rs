//! Sale lifecycle scenarios
//!
//! Full path through the public API: allow-listed purchases across both
//! pricing regimes, vesting accrual and claims, and finalization with
//! the unsold remainder burned. All state is library-owned; the token
//! side runs on the in-memory ledger.

use crescendo_common::{Address, Amount, Event, EventLog, InMemoryLedger, StaticAllowList, TokenLedger};
use crescendo_treasury::{Sale, VestingLedger};

const ONE: Amount = 1_000_000_000_000_000_000;
const TREASURY: Address = [0xff; 20];
const OPERATOR: Address = [0x01; 20];
const ALICE: Address = [0xa1; 20];
const BOB: Address = [0xb0; 20];

const START: u64 = 1_700_000_000;
const DURATION: u64 = 2_592_000; // 30 days

/// Purchase in both regimes, vest, claim in halves, finalize.
#[test]
fn test_sale_to_vesting_lifecycle() {
    println!("========================================");
    println!("Sale lifecycle: purchase, vest, finalize");
    println!("========================================");

    let hard_cap = 200_000_000 * ONE;
    let mut sale = Sale::new(OPERATOR, hard_cap);
    let mut vesting = VestingLedger::new();
    let mut events = EventLog::new();

    let mut allow = StaticAllowList::new();
    allow.allow(ALICE);
    allow.allow(BOB);

    // The treasury starts holding the full issuable supply
    let mut token = InMemoryLedger::new(TREASURY);
    token.mint(&TREASURY, hard_cap);

    // Alice buys 1M units at par: entirely linear pricing
    let tokens_alice = sale
        .purchase(ALICE, 1_000_000 * ONE, 100, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();
    assert_eq!(tokens_alice, 1_000_000 * ONE * 100 / 14);
    println!("Alice bought {} tokens (linear regime)", tokens_alice / ONE);

    // Bob buys 8M units at the deepest discount: the raise crosses the
    // threshold mid-purchase, so his price blends both regimes
    let tokens_bob = sale
        .purchase(BOB, 8_000_000 * ONE, 70, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();
    println!("Bob bought {} tokens (mixed regime)", tokens_bob / ONE);

    assert_eq!(sale.state().raised, 9_000_000 * ONE);
    assert_eq!(sale.state().sold_tokens, tokens_alice + tokens_bob);
    // Sanity band: 6M units at the flat rate plus 2M units on the
    // decaying curve, all at the deepest discount
    assert!(tokens_bob > 83_000_000 * ONE);
    assert!(tokens_bob < 90_000_000 * ONE);

    // Midway through the schedule Alice claims exactly half
    let mid = START + DURATION / 2;
    let first_claim = vesting.claim(&ALICE, mid, &mut token, &mut events).unwrap();
    assert_eq!(first_claim, tokens_alice / 2);
    assert_eq!(token.balance_of(&ALICE), first_claim);
    println!("Alice claimed {} tokens at the midpoint", first_claim / ONE);

    // At the end the remainder comes out; the halves partition exactly
    let second_claim = vesting
        .claim(&ALICE, START + DURATION, &mut token, &mut events)
        .unwrap();
    assert_eq!(first_claim + second_claim, tokens_alice);
    assert_eq!(token.balance_of(&ALICE), tokens_alice);

    // Finalize: the unsold remainder burns, further purchases bounce
    let burned = sale.finalize(OPERATOR, &mut token).unwrap();
    assert_eq!(burned, hard_cap - tokens_alice - tokens_bob);
    assert!(sale
        .purchase(ALICE, 100 * ONE, 100, DURATION, START, &allow, &mut vesting, &mut events)
        .is_err());
    println!("Finalized: {} tokens burned", burned / ONE);

    // What remains in the treasury is exactly Bob's unclaimed grant
    assert_eq!(token.balance_of(&TREASURY), tokens_bob);

    // Event stream: two per purchase, one per releasing claim
    let drained = events.drain();
    assert_eq!(drained.len(), 6);
    assert!(matches!(drained[0], Event::NewTokenGrant { beneficiary, .. } if beneficiary == ALICE));
    assert!(matches!(drained[1], Event::NewBuyer { beneficiary, .. } if beneficiary == ALICE));
    assert!(matches!(drained[2], Event::NewTokenGrant { beneficiary, .. } if beneficiary == BOB));
    assert!(matches!(drained[3], Event::NewBuyer { beneficiary, .. } if beneficiary == BOB));
    assert!(matches!(drained[4], Event::NewTokenClaim { amount, .. } if amount == first_claim));
    assert!(matches!(drained[5], Event::NewTokenClaim { amount, .. } if amount == second_claim));

    println!("========================================");
    println!("Sale lifecycle passed");
    println!("========================================");
}

/// A purchase that would touch the hard cap is rejected whole; one unit
/// less goes through.
#[test]
fn test_hard_cap_boundary() {
    println!("========================================");
    println!("Hard cap boundary");
    println!("========================================");

    // 140 units at par buy exactly 1,000 tokens
    let mut sale = Sale::new(OPERATOR, 1_000 * ONE);
    let mut vesting = VestingLedger::new();
    let mut events = EventLog::new();
    let mut allow = StaticAllowList::new();
    allow.allow(ALICE);

    let at_cap =
        sale.purchase(ALICE, 140 * ONE, 100, DURATION, START, &allow, &mut vesting, &mut events);
    assert!(at_cap.is_err(), "reaching the cap exactly must be rejected");
    assert_eq!(sale.state().raised, 0);
    assert_eq!(sale.state().sold_tokens, 0);
    assert!(vesting.grants_of(&ALICE).is_empty(), "no partial grant");
    assert!(events.is_empty(), "no events from a rejected purchase");

    let under_cap = sale
        .purchase(ALICE, 139 * ONE, 100, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();
    assert!(under_cap < 1_000 * ONE);
    println!("Under-cap purchase issued {} tokens", under_cap / ONE);

    // The remainder burns on finalization
    let mut token = InMemoryLedger::new(TREASURY);
    token.mint(&TREASURY, 1_000 * ONE);
    let burned = sale.finalize(OPERATOR, &mut token).unwrap();
    assert_eq!(burned, 1_000 * ONE - under_cap);

    println!("========================================");
    println!("Hard cap boundary passed");
    println!("========================================");
}

/// The same contribution at each discount tier issues proportionally.
#[test]
fn test_discount_tiers_issue_proportionally() {
    println!("========================================");
    println!("Discount tiers");
    println!("========================================");

    let mut sale = Sale::new(OPERATOR, 10_000_000 * ONE);
    let mut vesting = VestingLedger::new();
    let mut events = EventLog::new();
    let mut allow = StaticAllowList::new();
    allow.allow(ALICE);

    // Three identical contributions, deep in the linear regime, so the
    // raw price is the same each time and only the discount moves
    let raw = 100 * ONE * 100 / 14;
    let par = sale
        .purchase(ALICE, 100 * ONE, 100, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();
    let mid = sale
        .purchase(ALICE, 100 * ONE, 85, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();
    let deep = sale
        .purchase(ALICE, 100 * ONE, 70, DURATION, START, &allow, &mut vesting, &mut events)
        .unwrap();

    assert_eq!(par, raw);
    assert_eq!(mid, raw * 100 / 85);
    assert_eq!(deep, raw * 100 / 70);
    assert!(par < mid && mid < deep);
    println!("par {} / mid {} / deep {}", par, mid, deep);

    // Three grants accumulated side by side
    assert_eq!(vesting.grants_of(&ALICE).len(), 3);
    assert_eq!(vesting.total_vested_tokens(&ALICE), par + mid + deep);

    println!("========================================");
    println!("Discount tiers passed");
    println!("========================================");
}
