// crates/nectr-ledger/src/state.rs
//
// Explicit ledger state: the token ledger, position store, APR schedule, and
// mint policy held together in one value.
//
// All mutation goes through `apply`, which takes the caller's notion of
// "now". The state never reads a clock, so replaying the same operations
// with the same timestamps yields the same state.

use serde::{Deserialize, Serialize};

use nectr_core::amount::as_string;
use nectr_core::{Amount, LedgerError, Timestamp};

use crate::apr::{default_tiers, AprSchedule, AprTier};
use crate::mint::{
    MintPolicy, DEFAULT_ACCOUNT_BALANCE_CAP, DEFAULT_MAX_SUPPLY, DEFAULT_PER_CALL_MINT_CAP,
};
use crate::operation::{Operation, Outcome, Query, QueryResult};
use crate::positions::PositionStore;
use crate::token::TokenLedger;

/// Parameters a ledger is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub max_supply: Amount,
    pub per_call_mint_cap: Amount,
    pub account_balance_cap: Amount,
    pub apr_tiers: Vec<AprTier>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_supply: DEFAULT_MAX_SUPPLY,
            per_call_mint_cap: DEFAULT_PER_CALL_MINT_CAP,
            account_balance_cap: DEFAULT_ACCOUNT_BALANCE_CAP,
            apr_tiers: default_tiers(),
        }
    }
}

/// Aggregate figures for the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(with = "as_string")]
    pub total_supply: Amount,
    #[serde(with = "as_string")]
    pub max_supply: Amount,
    /// Supply sitting in free balances.
    #[serde(with = "as_string")]
    pub total_free: Amount,
    /// Supply locked in escrow.
    #[serde(with = "as_string")]
    pub total_escrowed: Amount,
    /// Principal of positions that have not been withdrawn.
    #[serde(with = "as_string")]
    pub total_staked: Amount,
    pub active_stakers: usize,
}

/// The complete ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub(crate) token: TokenLedger,
    pub(crate) positions: PositionStore,
    pub(crate) schedule: AprSchedule,
    pub(crate) mint_policy: MintPolicy,
}

impl LedgerState {
    /// Create an empty ledger. Fails with `InvalidConfig` on a bad schedule,
    /// zero caps, or a zero supply ceiling.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        if config.max_supply == 0 {
            return Err(LedgerError::InvalidConfig(
                "max supply must be positive".into(),
            ));
        }
        let schedule = AprSchedule::new(config.apr_tiers)?;
        let mint_policy = MintPolicy::new(config.per_call_mint_cap, config.account_balance_cap)?;
        Ok(Self {
            token: TokenLedger::new(config.max_supply),
            positions: PositionStore::new(),
            schedule,
            mint_policy,
        })
    }

    /// Swap in a new schedule, mint policy, and supply ceiling while keeping
    /// balances and positions.
    ///
    /// Open positions keep the rate they were opened with. All-or-nothing:
    /// on error the state is unchanged.
    pub fn reconfigure(&mut self, config: LedgerConfig) -> Result<(), LedgerError> {
        if config.max_supply == 0 {
            return Err(LedgerError::InvalidConfig(
                "max supply must be positive".into(),
            ));
        }
        let schedule = AprSchedule::new(config.apr_tiers)?;
        let mint_policy = MintPolicy::new(config.per_call_mint_cap, config.account_balance_cap)?;
        self.token.set_max_supply(config.max_supply)?;
        self.schedule = schedule;
        self.mint_policy = mint_policy;
        Ok(())
    }

    pub fn token(&self) -> &TokenLedger {
        &self.token
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn schedule(&self) -> &AprSchedule {
        &self.schedule
    }

    pub fn mint_policy(&self) -> &MintPolicy {
        &self.mint_policy
    }

    /// Execute a mutating operation at time `now`.
    ///
    /// On error nothing has changed.
    pub fn apply(&mut self, op: Operation, now: Timestamp) -> Result<Outcome, LedgerError> {
        let name = op.name();
        let result = op.execute(self, now);
        if let Err(ref e) = result {
            tracing::debug!(op = name, kind = e.kind(), error = %e, "Operation refused");
        }
        result
    }

    /// Answer a read-only query at time `now`.
    pub fn query(&self, query: Query, now: Timestamp) -> Result<QueryResult, LedgerError> {
        query.answer(self, now)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_supply: self.token.total_supply(),
            max_supply: self.token.max_supply(),
            total_free: self.token.total_free(),
            total_escrowed: self.token.total_escrowed(),
            total_staked: self.positions.total_active_principal(),
            active_stakers: self.positions.active_stakers_count(),
        }
    }

    /// Verify the accounting identities that hold after every operation:
    ///
    ///   total_supply == free + escrowed <= max_supply
    ///   escrowed(account) == principal of its open positions
    ///   claimed_interest <= accrued at maturity, for every position
    pub fn check_conservation(&self) -> Result<(), String> {
        let token = &self.token;
        let free = token.total_free();
        let escrowed = token.total_escrowed();
        match free.checked_add(escrowed) {
            Some(sum) if sum == token.total_supply() => {}
            _ => {
                return Err(format!(
                    "total supply {} != free {} + escrowed {}",
                    token.total_supply(),
                    free,
                    escrowed
                ))
            }
        }
        if token.total_supply() > token.max_supply() {
            return Err(format!(
                "total supply {} exceeds max supply {}",
                token.total_supply(),
                token.max_supply()
            ));
        }

        for account in self.positions.accounts() {
            let locked = self.positions.active_principal_of(account);
            if locked != token.escrowed_of(account) {
                return Err(format!(
                    "{} escrow {} != open principal {}",
                    account,
                    token.escrowed_of(account),
                    locked
                ));
            }
            for (id, position) in self.positions.list(account).iter().enumerate() {
                let cap = crate::staking::accrued_interest(position, position.end_time);
                if position.claimed_interest > cap {
                    return Err(format!(
                        "{} position #{} claimed {} above full-term interest {}",
                        account, id, position.claimed_interest, cap
                    ));
                }
            }
        }
        if escrowed != self.positions.total_active_principal() {
            return Err(format!(
                "escrow {} held by accounts without open positions",
                escrowed
            ));
        }
        Ok(())
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            token: TokenLedger::new(DEFAULT_MAX_SUPPLY),
            positions: PositionStore::new(),
            schedule: AprSchedule::default(),
            mint_policy: MintPolicy::default(),
        }
    }
}
