// crates/nectr-ledger/src/token.rs
//
// Token ledger: balances and total supply for NECTR.
//
// Each account has two buckets:
//   - free:    spendable balance, moved by mint/burn/transfer
//   - escrow:  principal locked against open stake positions
//
// Escrow moves never change total supply, so at all times
//   total_supply == sum(free) + sum(escrow) <= max_supply

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nectr_core::{AccountId, Amount, LedgerError};

/// Balances and supply for a single fungible token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Hard ceiling on total supply.
    max_supply: Amount,
    /// Current total supply (free + escrowed).
    total_supply: Amount,
    /// Spendable balances. Zero balances are not stored.
    balances: BTreeMap<AccountId, Amount>,
    /// Locked balances backing open stake positions.
    escrow: BTreeMap<AccountId, Amount>,
}

impl TokenLedger {
    /// Create an empty ledger with the given supply ceiling.
    pub fn new(max_supply: Amount) -> Self {
        Self {
            max_supply,
            total_supply: 0,
            balances: BTreeMap::new(),
            escrow: BTreeMap::new(),
        }
    }

    /// Free balance of `account`. Unknown accounts have zero.
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Escrowed (locked) balance of `account`.
    pub fn escrowed_of(&self, account: &AccountId) -> Amount {
        self.escrow.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    /// Sum of all escrowed balances.
    pub fn total_escrowed(&self) -> Amount {
        self.escrow.values().sum()
    }

    /// Sum of all free balances.
    pub fn total_free(&self) -> Amount {
        self.balances.values().sum()
    }

    /// How much more can be minted before hitting the ceiling.
    pub fn mintable_headroom(&self) -> Amount {
        self.max_supply.saturating_sub(self.total_supply)
    }

    /// Fails with `SupplyCeilingExceeded` if minting `amount` would exceed
    /// the ceiling. Does not mutate.
    pub fn check_supply_ceiling(&self, amount: Amount) -> Result<(), LedgerError> {
        match self.total_supply.checked_add(amount) {
            Some(total) if total <= self.max_supply => Ok(()),
            _ => Err(LedgerError::SupplyCeilingExceeded {
                total_supply: self.total_supply,
                requested: amount,
                max_supply: self.max_supply,
            }),
        }
    }

    /// Issue `amount` new tokens to `account`.
    ///
    /// # Errors
    /// `InvalidAmount` for zero, `SupplyCeilingExceeded` if the ceiling would
    /// be crossed. Nothing changes on error.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.check_supply_ceiling(amount)?;

        self.total_supply += amount;
        let balance = self.balance_of(account);
        set_bucket(&mut self.balances, account, balance + amount);
        Ok(())
    }

    /// Destroy `amount` of `account`'s free balance.
    pub fn burn(&mut self, account: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let balance = self.balance_of(account);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: balance,
                requested: amount,
            });
        }

        set_bucket(&mut self.balances, account, balance - amount);
        self.total_supply -= amount;
        Ok(())
    }

    /// Move `amount` of free balance from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: from_balance,
                requested: amount,
            });
        }
        if from == to {
            return Ok(());
        }

        set_bucket(&mut self.balances, from, from_balance - amount);
        let to_balance = self.balance_of(to);
        set_bucket(&mut self.balances, to, to_balance + amount);
        Ok(())
    }

    /// Move `amount` from the account's free balance into escrow.
    pub fn escrow_lock(&mut self, account: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let free = self.balance_of(account);
        if free < amount {
            return Err(LedgerError::InsufficientBalance {
                available: free,
                requested: amount,
            });
        }

        let locked = self.escrowed_of(account);
        set_bucket(&mut self.balances, account, free - amount);
        set_bucket(&mut self.escrow, account, locked + amount);
        Ok(())
    }

    /// Move `amount` from escrow back to the account's free balance.
    ///
    /// Only fails if the escrow bucket is smaller than `amount`, which the
    /// staking engine never asks for.
    pub fn escrow_release(
        &mut self,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let locked = self.escrowed_of(account);
        if locked < amount {
            return Err(LedgerError::InsufficientBalance {
                available: locked,
                requested: amount,
            });
        }

        let free = self.balance_of(account);
        set_bucket(&mut self.escrow, account, locked - amount);
        set_bucket(&mut self.balances, account, free + amount);
        Ok(())
    }

    /// Replace the supply ceiling. Fails if current supply is already above it.
    pub(crate) fn set_max_supply(&mut self, max_supply: Amount) -> Result<(), LedgerError> {
        if max_supply < self.total_supply {
            return Err(LedgerError::InvalidConfig(format!(
                "max supply {} is below current total supply {}",
                max_supply, self.total_supply
            )));
        }
        self.max_supply = max_supply;
        Ok(())
    }
}

fn set_bucket(bucket: &mut BTreeMap<AccountId, Amount>, account: &AccountId, value: Amount) {
    if value == 0 {
        bucket.remove(account);
    } else {
        bucket.insert(*account, value);
    }
}
