// crates/nectr-ledger/src/staking.rs
//
// Staking engine: open, claim, and withdraw against an explicit ledger state.
//
// Position lifecycle:
//   stake    -> Active   (principal moved from free balance into escrow)
//   claim    -> Active   (newly minted interest paid to the free balance)
//   withdraw -> Withdrawn (principal released; unclaimed interest forfeited)
//
// Interest is simple and time-proportional, quoted per 365-day year in
// basis points, and stops accruing at maturity:
//
//   accrued = amount * apr_bps * (min(now, end_time) - start_time)
//             / (SECONDS_PER_YEAR * 10_000)
//
// Each function either completes or returns an error with the state
// untouched.

use serde::{Deserialize, Serialize};

use nectr_core::amount::as_string;
use nectr_core::{AccountId, Amount, LedgerError, Timestamp, SECONDS_PER_YEAR};

use crate::apr::BPS_DENOMINATOR;
use crate::positions::{Position, PositionId};
use crate::state::LedgerState;

/// Open a new position locking `amount` for `duration_secs`.
///
/// # Errors
/// - `InvalidAmount` if `amount` is zero.
/// - `UnsupportedDuration` if the duration is not a configured tier.
/// - `InsufficientBalance` if the free balance cannot cover `amount`.
pub fn stake(
    state: &mut LedgerState,
    account: &AccountId,
    amount: Amount,
    duration_secs: u64,
    now: Timestamp,
) -> Result<PositionId, LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }
    let apr_bps = state.schedule.rate_for(duration_secs)?;
    state.token.escrow_lock(account, amount)?;
    let id = state
        .positions
        .open(account, amount, now, duration_secs, apr_bps);

    tracing::info!(
        account = %account,
        position = id,
        amount = %amount,
        duration_secs,
        apr_bps,
        "Stake opened"
    );
    Ok(id)
}

/// Pay out interest accrued on a position since the last claim.
///
/// Returns the amount paid. A second claim at the same instant pays 0.
///
/// # Errors
/// - `PositionNotFound` / `PositionWithdrawn` for a missing or closed position.
/// - `SupplyCeilingExceeded` if the interest cannot be minted; nothing is
///   credited in that case.
pub fn claim_interest(
    state: &mut LedgerState,
    account: &AccountId,
    id: PositionId,
    now: Timestamp,
) -> Result<Amount, LedgerError> {
    let position = state.positions.get_mut(account, id)?;
    if position.withdrawn {
        return Err(LedgerError::PositionWithdrawn {
            account: *account,
            position: id,
        });
    }

    let payable = accrued_interest(position, now).saturating_sub(position.claimed_interest);
    if payable == 0 {
        tracing::debug!(account = %account, position = id, "Nothing to claim");
        return Ok(0);
    }

    state.token.mint(account, payable)?;
    position.claimed_interest += payable;

    tracing::info!(
        account = %account,
        position = id,
        paid = %payable,
        claimed_total = %position.claimed_interest,
        "Interest claimed"
    );
    Ok(payable)
}

/// Return a position's principal and close it.
///
/// Early withdrawal is allowed. Interest accrued but not yet claimed is
/// forfeited.
///
/// # Errors
/// `PositionNotFound` / `PositionWithdrawn` for a missing or closed position.
pub fn withdraw(
    state: &mut LedgerState,
    account: &AccountId,
    id: PositionId,
    now: Timestamp,
) -> Result<Amount, LedgerError> {
    let position = state.positions.get_mut(account, id)?;
    if position.withdrawn {
        return Err(LedgerError::PositionWithdrawn {
            account: *account,
            position: id,
        });
    }

    state.token.escrow_release(account, position.amount)?;
    let forfeited = accrued_interest(position, now).saturating_sub(position.claimed_interest);
    position.withdrawn = true;

    tracing::info!(
        account = %account,
        position = id,
        principal = %position.amount,
        early = !position.is_matured(now),
        forfeited = %forfeited,
        "Position withdrawn"
    );
    Ok(position.amount)
}

/// What `claim_interest` would pay at `now`. Zero for withdrawn positions.
pub fn pending_interest(
    state: &LedgerState,
    account: &AccountId,
    id: PositionId,
    now: Timestamp,
) -> Result<Amount, LedgerError> {
    let position = state.positions.get(account, id)?;
    Ok(unclaimed(position, now))
}

/// Total interest a position has earned by `now`, capped at maturity.
pub fn accrued_interest(position: &Position, now: Timestamp) -> Amount {
    let accrual_end = now.min(position.end_time);
    let elapsed = accrual_end.saturating_sub(position.start_time);
    mul_div_floor(
        position.amount,
        position.apr_bps as u128 * elapsed as u128,
        SECONDS_PER_YEAR as u128 * BPS_DENOMINATOR,
    )
}

fn unclaimed(position: &Position, now: Timestamp) -> Amount {
    if position.withdrawn {
        0
    } else {
        accrued_interest(position, now).saturating_sub(position.claimed_interest)
    }
}

/// floor(a * b / d) without forming the full product.
///
/// With a = qa*d + ra and b = qb*d + rb:
///   a*b/d = qa*b + ra*qb + ra*rb/d
/// and ra*rb < d^2, which fits for any accrual denominator.
fn mul_div_floor(a: u128, b: u128, d: u128) -> u128 {
    let (qa, ra) = (a / d, a % d);
    let (qb, rb) = (b / d, b % d);
    qa.saturating_mul(b)
        .saturating_add(ra.saturating_mul(qb))
        .saturating_add(ra * rb / d)
}

/// Lifecycle status of a position as seen at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    /// Locked and still accruing.
    Active,
    /// Past maturity; no further accrual, principal not yet withdrawn.
    Matured,
    /// Principal returned. Terminal.
    Withdrawn,
}

/// Read model of a position for dashboards and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub id: PositionId,
    #[serde(with = "as_string")]
    pub amount: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub apr_bps: u32,
    #[serde(with = "as_string")]
    pub claimed_interest: Amount,
    #[serde(with = "as_string")]
    pub pending_interest: Amount,
    pub status: PositionStatus,
    /// Elapsed share of the lock in basis points, capped at 10,000.
    pub progress_bps: u32,
    pub seconds_remaining: u64,
}

impl PositionView {
    pub fn new(id: PositionId, position: &Position, now: Timestamp) -> Self {
        let status = if position.withdrawn {
            PositionStatus::Withdrawn
        } else if position.is_matured(now) {
            PositionStatus::Matured
        } else {
            PositionStatus::Active
        };

        let duration = position.duration();
        let elapsed = now.min(position.end_time).saturating_sub(position.start_time);
        let progress_bps = if duration == 0 {
            BPS_DENOMINATOR as u32
        } else {
            (elapsed as u128 * BPS_DENOMINATOR / duration as u128) as u32
        };

        Self {
            id,
            amount: position.amount,
            start_time: position.start_time,
            end_time: position.end_time,
            apr_bps: position.apr_bps,
            claimed_interest: position.claimed_interest,
            pending_interest: unclaimed(position, now),
            status,
            progress_bps,
            seconds_remaining: position.end_time.saturating_sub(now),
        }
    }
}

/// View of a single position at `now`.
pub fn position_view(
    state: &LedgerState,
    account: &AccountId,
    id: PositionId,
    now: Timestamp,
) -> Result<PositionView, LedgerError> {
    let position = state.positions.get(account, id)?;
    Ok(PositionView::new(id, position, now))
}

/// Views of all of an account's positions at `now`, oldest first.
pub fn positions_view(state: &LedgerState, account: &AccountId, now: Timestamp) -> Vec<PositionView> {
    state
        .positions
        .list(account)
        .iter()
        .enumerate()
        .map(|(i, p)| PositionView::new(i as PositionId, p, now))
        .collect()
}
