// crates/nectr-ledger/src/positions.rs
//
// Stake position store.
//
// Positions are kept per account in creation order. A position's id is its
// index in that list, so ids are assigned monotonically and never reused.
// Closed positions stay in the list as an audit record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nectr_core::{AccountId, Amount, LedgerError, Timestamp};

/// Index of a position within its owner's list.
pub type PositionId = u64;

/// A single locked deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Principal in smallest units. Fixed at creation.
    pub amount: Amount,
    /// When the position was opened.
    pub start_time: Timestamp,
    /// Maturity: `start_time + duration`. Accrual stops here.
    pub end_time: Timestamp,
    /// Annual rate in basis points, captured when the position was opened.
    pub apr_bps: u32,
    /// Interest already paid out. Never decreases.
    pub claimed_interest: Amount,
    /// Set once principal has been returned. Terminal.
    pub withdrawn: bool,
}

impl Position {
    /// Lock duration in seconds.
    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn is_active(&self) -> bool {
        !self.withdrawn
    }

    pub fn is_matured(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }
}

/// Per-account collection of stake positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStore {
    positions: BTreeMap<AccountId, Vec<Position>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new active position and return its id.
    pub fn open(
        &mut self,
        account: &AccountId,
        amount: Amount,
        start_time: Timestamp,
        duration_secs: u64,
        apr_bps: u32,
    ) -> PositionId {
        let list = self.positions.entry(*account).or_default();
        list.push(Position {
            amount,
            start_time,
            end_time: start_time.saturating_add(duration_secs),
            apr_bps,
            claimed_interest: 0,
            withdrawn: false,
        });
        (list.len() - 1) as PositionId
    }

    /// Look up a position.
    ///
    /// # Errors
    /// `PositionNotFound` if the account has no position with this id.
    pub fn get(&self, account: &AccountId, id: PositionId) -> Result<&Position, LedgerError> {
        self.positions
            .get(account)
            .and_then(|list| list.get(id as usize))
            .ok_or(LedgerError::PositionNotFound {
                account: *account,
                position: id,
            })
    }

    pub(crate) fn get_mut(
        &mut self,
        account: &AccountId,
        id: PositionId,
    ) -> Result<&mut Position, LedgerError> {
        self.positions
            .get_mut(account)
            .and_then(|list| list.get_mut(id as usize))
            .ok_or(LedgerError::PositionNotFound {
                account: *account,
                position: id,
            })
    }

    /// All of an account's positions, oldest first. Includes withdrawn ones.
    pub fn list(&self, account: &AccountId) -> &[Position] {
        self.positions
            .get(account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The account's positions that have not been withdrawn, with their ids.
    pub fn list_active(&self, account: &AccountId) -> Vec<(PositionId, &Position)> {
        self.list(account)
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_active())
            .map(|(i, p)| (i as PositionId, p))
            .collect()
    }

    /// Number of accounts with at least one active position.
    pub fn active_stakers_count(&self) -> usize {
        self.positions
            .values()
            .filter(|list| list.iter().any(Position::is_active))
            .count()
    }

    /// Sum of principal over all active positions.
    pub fn total_active_principal(&self) -> Amount {
        self.positions
            .values()
            .flatten()
            .filter(|p| p.is_active())
            .map(|p| p.amount)
            .sum()
    }

    /// Principal of `account`'s active positions.
    pub fn active_principal_of(&self, account: &AccountId) -> Amount {
        self.list(account)
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.amount)
            .sum()
    }

    /// Accounts that have ever opened a position.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountId> {
        self.positions.keys()
    }
}
