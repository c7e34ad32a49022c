// crates/nectr-ledger/tests/ledger_invariants.rs
//
// End-to-end sequences through `LedgerState::apply`, checking the
// accounting identities after every step.

use nectr_core::{AccountId, Amount, LedgerError, Timestamp, SECONDS_PER_DAY, UNITS_PER_NECTR};
use nectr_ledger::{
    LedgerConfig, LedgerState, Operation, Outcome, PositionStatus, Query, QueryResult,
};
use pretty_assertions::assert_eq;

const T0: Timestamp = 1_700_000_000;
const DAY: u64 = SECONDS_PER_DAY;

fn acct(b: u8) -> AccountId {
    AccountId::from_bytes([b; 20])
}

fn nectr(whole: u128) -> Amount {
    whole * UNITS_PER_NECTR
}

fn apply_checked(state: &mut LedgerState, op: Operation, now: Timestamp) -> Result<Outcome, LedgerError> {
    let before = state.clone();
    let result = state.apply(op, now);
    if result.is_err() {
        assert_eq!(*state, before, "failed operation changed state");
    }
    if let Err(e) = state.check_conservation() {
        panic!("conservation broken: {}", e);
    }
    result
}

fn mint(state: &mut LedgerState, account: AccountId, amount: Amount, now: Timestamp) {
    apply_checked(state, Operation::Mint { account, amount }, now).unwrap();
}

fn stake(state: &mut LedgerState, account: AccountId, amount: Amount, days: u64, now: Timestamp) -> u64 {
    match apply_checked(
        state,
        Operation::Stake {
            account,
            amount,
            duration_secs: days * DAY,
        },
        now,
    ) {
        Ok(Outcome::Staked { position, .. }) => position,
        other => panic!("stake failed: {:?}", other),
    }
}

#[test]
fn mixed_sequence_preserves_conservation() {
    let mut state = LedgerState::new(LedgerConfig::default()).unwrap();
    let (alice, bob, carol) = (acct(1), acct(2), acct(3));

    mint(&mut state, alice, nectr(1_000_000), T0);
    mint(&mut state, bob, nectr(1_000), T0);

    let a0 = stake(&mut state, alice, nectr(400_000), 365, T0);
    let a1 = stake(&mut state, alice, nectr(100_000), 30, T0 + DAY);
    let b0 = stake(&mut state, bob, nectr(1_000), 730, T0 + 2 * DAY);

    apply_checked(
        &mut state,
        Operation::Transfer {
            from: alice,
            to: carol,
            amount: nectr(250_000),
        },
        T0 + 3 * DAY,
    )
    .unwrap();

    // Alice's remaining free balance is 250,000; this must fail.
    let refused = apply_checked(
        &mut state,
        Operation::Transfer {
            from: alice,
            to: carol,
            amount: nectr(250_001),
        },
        T0 + 3 * DAY,
    );
    assert!(matches!(refused, Err(LedgerError::InsufficientBalance { .. })));

    for day in [10u64, 20, 40, 100, 400] {
        for (owner, id) in [(alice, a0), (alice, a1), (bob, b0)] {
            let claimed = apply_checked(
                &mut state,
                Operation::ClaimInterest {
                    account: owner,
                    position: id,
                },
                T0 + day * DAY,
            );
            assert!(
                matches!(claimed, Ok(Outcome::InterestClaimed { position, .. }) if position == id),
                "claim on {} #{} at day {}: {:?}",
                owner,
                id,
                day,
                claimed
            );
        }
    }

    apply_checked(
        &mut state,
        Operation::Withdraw {
            account: alice,
            position: a1,
        },
        T0 + 400 * DAY,
    )
    .unwrap();
    apply_checked(
        &mut state,
        Operation::Burn {
            account: carol,
            amount: nectr(50_000),
        },
        T0 + 400 * DAY,
    )
    .unwrap();

    let stats = match state.query(Query::Stats, T0 + 400 * DAY).unwrap() {
        QueryResult::Stats(stats) => stats,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(stats.total_staked, nectr(401_000));
    assert_eq!(stats.active_stakers, 2);
    assert_eq!(stats.total_escrowed, nectr(401_000));
}

#[test]
fn withdraw_is_allowed_once() {
    let mut state = LedgerState::default();
    let alice = acct(1);
    mint(&mut state, alice, nectr(10), T0);
    let id = stake(&mut state, alice, nectr(10), 90, T0);

    let withdraw = Operation::Withdraw {
        account: alice,
        position: id,
    };
    assert_eq!(
        apply_checked(&mut state, withdraw.clone(), T0 + DAY),
        Ok(Outcome::Withdrawn {
            position: id,
            principal: nectr(10),
        })
    );
    assert!(matches!(
        apply_checked(&mut state, withdraw, T0 + 2 * DAY),
        Err(LedgerError::PositionWithdrawn { .. })
    ));
    match state.query(Query::BalanceOf { account: alice }, T0).unwrap() {
        QueryResult::Balance(view) => {
            assert_eq!(view.free, nectr(10));
            assert_eq!(view.escrowed, 0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn claimed_interest_never_exceeds_full_term() {
    let mut state = LedgerState::default();
    let alice = acct(1);
    mint(&mut state, alice, nectr(1_000), T0);
    let id = stake(&mut state, alice, nectr(1_000), 180, T0);

    let mut paid_total: Amount = 0;
    let mut now = T0;
    while now < T0 + 400 * DAY {
        now += 7 * DAY + 13;
        if let Ok(Outcome::InterestClaimed { paid, .. }) = apply_checked(
            &mut state,
            Operation::ClaimInterest {
                account: alice,
                position: id,
            },
            now,
        ) {
            paid_total += paid;
        }
    }

    // 1,000 NECTR at 9% for 180/365 of a year.
    let full_term = nectr(1_000) * 900 * 180 / (365 * 10_000);
    assert_eq!(paid_total, full_term);

    match state.query(Query::PositionsOf { account: alice }, now).unwrap() {
        QueryResult::Positions(views) => {
            assert_eq!(views[0].status, PositionStatus::Matured);
            assert_eq!(views[0].claimed_interest, full_term);
            assert_eq!(views[0].pending_interest, 0);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn staking_more_than_balance_is_refused() {
    let mut state = LedgerState::default();
    let alice = acct(1);
    mint(&mut state, alice, 500, T0);
    let result = apply_checked(
        &mut state,
        Operation::Stake {
            account: alice,
            amount: 501,
            duration_secs: 30 * DAY,
        },
        T0,
    );
    assert_eq!(
        result,
        Err(LedgerError::InsufficientBalance {
            available: 500,
            requested: 501,
        })
    );
    match state.query(Query::PositionsOf { account: alice }, T0).unwrap() {
        QueryResult::Positions(views) => assert!(views.is_empty()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn mint_guards_refuse_in_order() {
    let config = LedgerConfig {
        max_supply: nectr(1_500_000),
        ..LedgerConfig::default()
    };
    let mut state = LedgerState::new(config).unwrap();
    let alice = acct(1);

    assert!(matches!(
        apply_checked(&mut state, Operation::Mint { account: alice, amount: nectr(2_000_000) }, T0),
        Err(LedgerError::PerCallCapExceeded { .. })
    ));
    mint(&mut state, alice, nectr(1_000_000), T0);
    assert!(matches!(
        apply_checked(&mut state, Operation::Mint { account: acct(2), amount: nectr(600_000) }, T0),
        Err(LedgerError::SupplyCeilingExceeded { .. })
    ));
    assert!(matches!(
        apply_checked(&mut state, Operation::Mint { account: acct(2), amount: 0 }, T0),
        Err(LedgerError::InvalidAmount)
    ));
}

#[test]
fn replaying_operations_is_deterministic() {
    let ops = vec![
        (Operation::Mint { account: acct(1), amount: nectr(5_000) }, T0),
        (
            Operation::Stake {
                account: acct(1),
                amount: nectr(2_000),
                duration_secs: 90 * DAY,
            },
            T0 + 5,
        ),
        (Operation::ClaimInterest { account: acct(1), position: 0 }, T0 + 45 * DAY),
        (Operation::Transfer { from: acct(1), to: acct(2), amount: nectr(3) }, T0 + 46 * DAY),
        (Operation::Withdraw { account: acct(1), position: 0 }, T0 + 91 * DAY),
    ];

    let run = || {
        let mut state = LedgerState::default();
        for (op, now) in ops.clone() {
            state.apply(op, now).unwrap();
        }
        state
    };
    assert_eq!(run(), run());
}
