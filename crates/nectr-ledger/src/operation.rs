// crates/nectr-ledger/src/operation.rs
//
// Closed sets of ledger mutations and reads.
//
// `Operation` is the only way state changes. It serializes with an `op` tag
// so a log of operations can be stored and replayed.

use serde::{Deserialize, Serialize};

use nectr_core::amount::as_string;
use nectr_core::{AccountId, Amount, LedgerError, Timestamp};

use crate::apr::AprTier;
use crate::mint;
use crate::positions::PositionId;
use crate::staking::{self, PositionView};
use crate::state::{LedgerState, Stats};

/// A state-changing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Stake {
        account: AccountId,
        #[serde(with = "as_string")]
        amount: Amount,
        duration_secs: u64,
    },
    ClaimInterest {
        account: AccountId,
        position: PositionId,
    },
    Withdraw {
        account: AccountId,
        position: PositionId,
    },
    Mint {
        account: AccountId,
        #[serde(with = "as_string")]
        amount: Amount,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        #[serde(with = "as_string")]
        amount: Amount,
    },
    Burn {
        account: AccountId,
        #[serde(with = "as_string")]
        amount: Amount,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Stake { .. } => "stake",
            Operation::ClaimInterest { .. } => "claim_interest",
            Operation::Withdraw { .. } => "withdraw",
            Operation::Mint { .. } => "mint",
            Operation::Transfer { .. } => "transfer",
            Operation::Burn { .. } => "burn",
        }
    }

    /// The account initiating the operation.
    pub fn account(&self) -> &AccountId {
        match self {
            Operation::Stake { account, .. }
            | Operation::ClaimInterest { account, .. }
            | Operation::Withdraw { account, .. }
            | Operation::Mint { account, .. }
            | Operation::Burn { account, .. } => account,
            Operation::Transfer { from, .. } => from,
        }
    }

    pub(crate) fn execute(
        self,
        state: &mut LedgerState,
        now: Timestamp,
    ) -> Result<Outcome, LedgerError> {
        match self {
            Operation::Stake {
                account,
                amount,
                duration_secs,
            } => {
                let position = staking::stake(state, &account, amount, duration_secs, now)?;
                let opened = state.positions.get(&account, position)?;
                Ok(Outcome::Staked {
                    position,
                    amount,
                    apr_bps: opened.apr_bps,
                    start_time: opened.start_time,
                    end_time: opened.end_time,
                })
            }
            Operation::ClaimInterest { account, position } => {
                let paid = staking::claim_interest(state, &account, position, now)?;
                Ok(Outcome::InterestClaimed { position, paid })
            }
            Operation::Withdraw { account, position } => {
                let principal = staking::withdraw(state, &account, position, now)?;
                Ok(Outcome::Withdrawn {
                    position,
                    principal,
                })
            }
            Operation::Mint { account, amount } => {
                let balance = mint::mint(state, &account, amount)?;
                Ok(Outcome::Minted { amount, balance })
            }
            Operation::Transfer { from, to, amount } => {
                state.token.transfer(&from, &to, amount)?;
                tracing::info!(from = %from, to = %to, amount = %amount, "Transferred");
                Ok(Outcome::Transferred {
                    amount,
                    balance: state.token.balance_of(&from),
                })
            }
            Operation::Burn { account, amount } => {
                state.token.burn(&account, amount)?;
                tracing::info!(account = %account, amount = %amount, "Burned");
                Ok(Outcome::Burned {
                    amount,
                    total_supply: state.token.total_supply(),
                })
            }
        }
    }
}

/// What a successful operation did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Staked {
        position: PositionId,
        #[serde(with = "as_string")]
        amount: Amount,
        apr_bps: u32,
        start_time: Timestamp,
        end_time: Timestamp,
    },
    InterestClaimed {
        position: PositionId,
        #[serde(with = "as_string")]
        paid: Amount,
    },
    Withdrawn {
        position: PositionId,
        #[serde(with = "as_string")]
        principal: Amount,
    },
    Minted {
        #[serde(with = "as_string")]
        amount: Amount,
        /// Free balance after the mint.
        #[serde(with = "as_string")]
        balance: Amount,
    },
    Transferred {
        #[serde(with = "as_string")]
        amount: Amount,
        /// Sender's free balance after the transfer.
        #[serde(with = "as_string")]
        balance: Amount,
    },
    Burned {
        #[serde(with = "as_string")]
        amount: Amount,
        #[serde(with = "as_string")]
        total_supply: Amount,
    },
}

/// A read-only request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    BalanceOf { account: AccountId },
    PositionsOf { account: AccountId },
    AprFor { duration_secs: u64 },
    AprTiers,
    Stats,
    PendingInterest { account: AccountId, position: PositionId },
}

/// Free and escrowed balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub account: AccountId,
    #[serde(with = "as_string")]
    pub free: Amount,
    #[serde(with = "as_string")]
    pub escrowed: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Balance(BalanceView),
    Positions(Vec<PositionView>),
    Apr { duration_secs: u64, rate_bps: u32 },
    Tiers(Vec<AprTier>),
    Stats(Stats),
    PendingInterest { position: PositionId, amount: Amount },
}

impl Query {
    pub(crate) fn answer(
        self,
        state: &LedgerState,
        now: Timestamp,
    ) -> Result<QueryResult, LedgerError> {
        match self {
            Query::BalanceOf { account } => Ok(QueryResult::Balance(BalanceView {
                free: state.token.balance_of(&account),
                escrowed: state.token.escrowed_of(&account),
                account,
            })),
            Query::PositionsOf { account } => Ok(QueryResult::Positions(
                staking::positions_view(state, &account, now),
            )),
            Query::AprFor { duration_secs } => Ok(QueryResult::Apr {
                duration_secs,
                rate_bps: state.schedule.rate_for(duration_secs)?,
            }),
            Query::AprTiers => Ok(QueryResult::Tiers(state.schedule.tiers().to_vec())),
            Query::Stats => Ok(QueryResult::Stats(state.stats())),
            Query::PendingInterest { account, position } => Ok(QueryResult::PendingInterest {
                position,
                amount: staking::pending_interest(state, &account, position, now)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nectr_core::SECONDS_PER_DAY;
    use pretty_assertions::assert_eq;

    fn alice() -> AccountId {
        AccountId::from_bytes([0xaa; 20])
    }

    fn bob() -> AccountId {
        AccountId::from_bytes([0xbb; 20])
    }

    #[test]
    fn test_operation_json_shape() {
        let op = Operation::Stake {
            account: alice(),
            amount: 1_000,
            duration_secs: 30 * SECONDS_PER_DAY,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "stake",
                "account": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "amount": "1000",
                "duration_secs": 2_592_000u64,
            })
        );
        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_apply_mint_transfer_burn() {
        let mut state = LedgerState::default();
        let outcome = state
            .apply(
                Operation::Mint {
                    account: alice(),
                    amount: 900,
                },
                0,
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Minted {
                amount: 900,
                balance: 900
            }
        );

        let outcome = state
            .apply(
                Operation::Transfer {
                    from: alice(),
                    to: bob(),
                    amount: 400,
                },
                0,
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Transferred {
                amount: 400,
                balance: 500
            }
        );

        let outcome = state
            .apply(
                Operation::Burn {
                    account: bob(),
                    amount: 100,
                },
                0,
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Burned {
                amount: 100,
                total_supply: 800
            }
        );
        assert!(state.check_conservation().is_ok());
    }

    #[test]
    fn test_apply_stake_reports_terms() {
        let mut state = LedgerState::default();
        state.token.mint(&alice(), 1_000).unwrap();
        let outcome = state
            .apply(
                Operation::Stake {
                    account: alice(),
                    amount: 600,
                    duration_secs: 90 * SECONDS_PER_DAY,
                },
                100,
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Staked {
                position: 0,
                amount: 600,
                apr_bps: 700,
                start_time: 100,
                end_time: 100 + 90 * SECONDS_PER_DAY,
            }
        );
    }

    #[test]
    fn test_failed_apply_leaves_state_untouched() {
        let mut state = LedgerState::default();
        state.token.mint(&alice(), 100).unwrap();
        let before = state.clone();
        let err = state
            .apply(
                Operation::Transfer {
                    from: alice(),
                    to: bob(),
                    amount: 101,
                },
                0,
            )
            .unwrap_err();
        assert_eq!(err.kind(), "InsufficientBalance");
        assert_eq!(state, before);
    }

    #[test]
    fn test_queries() {
        let mut state = LedgerState::default();
        state.token.mint(&alice(), 1_000).unwrap();
        staking::stake(&mut state, &alice(), 400, 365 * SECONDS_PER_DAY, 0).unwrap();

        assert_eq!(
            state.query(Query::BalanceOf { account: alice() }, 0),
            Ok(QueryResult::Balance(BalanceView {
                account: alice(),
                free: 600,
                escrowed: 400,
            }))
        );
        assert_eq!(
            state.query(
                Query::AprFor {
                    duration_secs: 180 * SECONDS_PER_DAY
                },
                0
            ),
            Ok(QueryResult::Apr {
                duration_secs: 180 * SECONDS_PER_DAY,
                rate_bps: 900,
            })
        );
        assert!(matches!(
            state.query(Query::AprFor { duration_secs: 1 }, 0),
            Err(LedgerError::UnsupportedDuration { duration_secs: 1 })
        ));
        match state.query(Query::Stats, 0) {
            Ok(QueryResult::Stats(stats)) => {
                assert_eq!(stats.total_staked, 400);
                assert_eq!(stats.active_stakers, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            state.query(Query::PositionsOf { account: bob() }, 0),
            Ok(QueryResult::Positions(ref v)) if v.is_empty()
        ));
        assert!(matches!(
            state.query(Query::AprTiers, 0),
            Ok(QueryResult::Tiers(ref t)) if t.len() == 5
        ));
    }
}
