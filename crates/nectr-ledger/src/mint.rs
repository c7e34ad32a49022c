// crates/nectr-ledger/src/mint.rs
//
// Mint policy guard for the faucet-style mint entry point.
//
// Guards are evaluated in a fixed order and the first failure wins:
//   1. amount > 0
//   2. amount <= per-call cap
//   3. free balance + amount <= per-account balance cap
//   4. total supply + amount <= max supply
//
// Interest payouts bypass this module and are subject only to the supply
// ceiling enforced by `TokenLedger::mint`.

use serde::{Deserialize, Serialize};

use nectr_core::{AccountId, Amount, LedgerError, Nectr};

use crate::state::LedgerState;
use crate::token::TokenLedger;

/// Hard ceiling on total supply: 10 billion NECTR.
pub const DEFAULT_MAX_SUPPLY: Amount = Nectr::from_whole(10_000_000_000).units;

/// Largest single mint request: 1 million NECTR.
pub const DEFAULT_PER_CALL_MINT_CAP: Amount = Nectr::from_whole(1_000_000).units;

/// Minting is refused once it would lift a free balance past 1 billion NECTR.
pub const DEFAULT_ACCOUNT_BALANCE_CAP: Amount = Nectr::from_whole(1_000_000_000).units;

/// Caps applied to every externally requested mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPolicy {
    per_call_cap: Amount,
    account_balance_cap: Amount,
}

impl MintPolicy {
    pub fn new(per_call_cap: Amount, account_balance_cap: Amount) -> Result<Self, LedgerError> {
        if per_call_cap == 0 {
            return Err(LedgerError::InvalidConfig(
                "per-call mint cap must be positive".into(),
            ));
        }
        if account_balance_cap == 0 {
            return Err(LedgerError::InvalidConfig(
                "account balance cap must be positive".into(),
            ));
        }
        Ok(Self {
            per_call_cap,
            account_balance_cap,
        })
    }

    pub fn per_call_cap(&self) -> Amount {
        self.per_call_cap
    }

    pub fn account_balance_cap(&self) -> Amount {
        self.account_balance_cap
    }

    /// Run every guard against `token` without mutating it.
    pub fn check(
        &self,
        token: &TokenLedger,
        account: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.per_call_cap {
            return Err(LedgerError::PerCallCapExceeded {
                requested: amount,
                cap: self.per_call_cap,
            });
        }
        let balance = token.balance_of(account);
        match balance.checked_add(amount) {
            Some(after) if after <= self.account_balance_cap => {}
            _ => {
                return Err(LedgerError::AccountBalanceCapExceeded {
                    balance,
                    requested: amount,
                    cap: self.account_balance_cap,
                })
            }
        }
        token.check_supply_ceiling(amount)
    }
}

impl Default for MintPolicy {
    fn default() -> Self {
        Self {
            per_call_cap: DEFAULT_PER_CALL_MINT_CAP,
            account_balance_cap: DEFAULT_ACCOUNT_BALANCE_CAP,
        }
    }
}

/// Mint `amount` to `account` after the policy guards pass.
///
/// Returns the account's new free balance.
pub fn mint(state: &mut LedgerState, account: &AccountId, amount: Amount) -> Result<Amount, LedgerError> {
    state.mint_policy.check(&state.token, account, amount)?;
    state.token.mint(account, amount)?;

    let balance = state.token.balance_of(account);
    tracing::info!(
        account = %account,
        amount = %Nectr::from_units(amount),
        balance = %Nectr::from_units(balance),
        "Minted"
    );
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LedgerConfig;
    use nectr_core::UNITS_PER_NECTR;
    use test_case::test_case;

    fn user() -> AccountId {
        AccountId::from_bytes([9u8; 20])
    }

    fn nectr(whole: u128) -> Amount {
        whole * UNITS_PER_NECTR
    }

    fn default_state() -> LedgerState {
        LedgerState::new(LedgerConfig::default()).unwrap()
    }

    #[test_case(100 ; "hundred")]
    #[test_case(1_000 ; "thousand")]
    #[test_case(1_000_000 ; "million at the cap")]
    fn test_menu_amounts_are_accepted(whole: u128) {
        let mut state = default_state();
        assert_eq!(mint(&mut state, &user(), nectr(whole)), Ok(nectr(whole)));
        assert_eq!(state.token.total_supply(), nectr(whole));
    }

    #[test]
    fn test_over_per_call_cap() {
        let mut state = default_state();
        let result = mint(&mut state, &user(), nectr(2_000_000));
        assert_eq!(
            result,
            Err(LedgerError::PerCallCapExceeded {
                requested: nectr(2_000_000),
                cap: nectr(1_000_000),
            })
        );
        assert_eq!(state.token.total_supply(), 0);
        assert_eq!(state.token.balance_of(&user()), 0);
    }

    #[test]
    fn test_zero_is_invalid_before_any_cap() {
        let mut state = default_state();
        assert_eq!(mint(&mut state, &user(), 0), Err(LedgerError::InvalidAmount));
    }

    #[test]
    fn test_account_cap_counts_free_balance() {
        let config = LedgerConfig {
            account_balance_cap: nectr(1_500),
            ..LedgerConfig::default()
        };
        let mut state = LedgerState::new(config).unwrap();
        mint(&mut state, &user(), nectr(1_000)).unwrap();
        mint(&mut state, &user(), nectr(500)).unwrap();

        let result = mint(&mut state, &user(), 1);
        assert_eq!(
            result,
            Err(LedgerError::AccountBalanceCapExceeded {
                balance: nectr(1_500),
                requested: 1,
                cap: nectr(1_500),
            })
        );
        assert_eq!(state.token.balance_of(&user()), nectr(1_500));
    }

    #[test]
    fn test_per_call_cap_wins_over_supply_ceiling() {
        let config = LedgerConfig {
            max_supply: nectr(10),
            ..LedgerConfig::default()
        };
        let mut state = LedgerState::new(config).unwrap();
        assert!(matches!(
            mint(&mut state, &user(), nectr(2_000_000)),
            Err(LedgerError::PerCallCapExceeded { .. })
        ));
    }

    #[test]
    fn test_account_cap_wins_over_supply_ceiling() {
        let config = LedgerConfig {
            max_supply: nectr(10),
            account_balance_cap: nectr(5),
            ..LedgerConfig::default()
        };
        let mut state = LedgerState::new(config).unwrap();
        assert!(matches!(
            mint(&mut state, &user(), nectr(20)),
            Err(LedgerError::AccountBalanceCapExceeded { .. })
        ));
    }

    #[test]
    fn test_supply_ceiling_is_last_guard() {
        let config = LedgerConfig {
            max_supply: nectr(10),
            ..LedgerConfig::default()
        };
        let mut state = LedgerState::new(config).unwrap();
        mint(&mut state, &user(), nectr(10)).unwrap();
        let other = AccountId::from_bytes([1u8; 20]);
        assert_eq!(
            mint(&mut state, &other, 1),
            Err(LedgerError::SupplyCeilingExceeded {
                total_supply: nectr(10),
                requested: 1,
                max_supply: nectr(10),
            })
        );
    }

    #[test]
    fn test_zero_caps_are_rejected() {
        assert!(matches!(MintPolicy::new(0, 1), Err(LedgerError::InvalidConfig(_))));
        assert!(matches!(MintPolicy::new(1, 0), Err(LedgerError::InvalidConfig(_))));
    }
}
