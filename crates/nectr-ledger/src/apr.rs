// crates/nectr-ledger/src/apr.rs
//
// Duration-tiered APR schedule.
//
// A stake's yield is chosen by its lock duration. Lookup is an exact match:
// a duration between two tiers is rejected rather than interpolated, so
// every position's rate can be read straight off the table.
//
// Default tiers (the durations the dashboard offers):
//   30 days:   5.00%
//   90 days:   7.00%
//  180 days:   9.00%
//  365 days:  10.00%
//  730 days:  12.00%

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use nectr_core::{LedgerError, SECONDS_PER_DAY};

/// Rates are expressed in basis points: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// One row of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AprTier {
    /// Lock duration in seconds.
    pub duration_secs: u64,
    /// Annual rate in basis points.
    pub rate_bps: u32,
}

impl AprTier {
    pub const fn days(days: u64, rate_bps: u32) -> Self {
        Self {
            duration_secs: days * SECONDS_PER_DAY,
            rate_bps,
        }
    }
}

/// The default tier table.
pub fn default_tiers() -> Vec<AprTier> {
    vec![
        AprTier::days(30, 500),
        AprTier::days(90, 700),
        AprTier::days(180, 900),
        AprTier::days(365, 1_000),
        AprTier::days(730, 1_200),
    ]
}

/// A validated, duration-ordered set of APR tiers.
///
/// Invariants: non-empty, no zero duration, durations unique, rates
/// non-decreasing as duration grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AprTier>", into = "Vec<AprTier>")]
pub struct AprSchedule {
    tiers: Vec<AprTier>,
}

impl AprSchedule {
    /// Validate and build a schedule. Tier order in the input does not matter.
    pub fn new(mut tiers: Vec<AprTier>) -> Result<Self, LedgerError> {
        if tiers.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "APR schedule needs at least one tier".to_string(),
            ));
        }
        if tiers.iter().any(|t| t.duration_secs == 0) {
            return Err(LedgerError::InvalidConfig(
                "APR tier duration must be greater than zero".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        for tier in &tiers {
            if !seen.insert(tier.duration_secs) {
                return Err(LedgerError::InvalidConfig(format!(
                    "duplicate APR tier for {}s",
                    tier.duration_secs
                )));
            }
        }

        tiers.sort_by_key(|t| t.duration_secs);
        for pair in tiers.windows(2) {
            if pair[1].rate_bps < pair[0].rate_bps {
                return Err(LedgerError::InvalidConfig(format!(
                    "APR tiers must not decrease with duration: {}s at {} bps, {}s at {} bps",
                    pair[0].duration_secs, pair[0].rate_bps, pair[1].duration_secs, pair[1].rate_bps
                )));
            }
        }

        Ok(Self { tiers })
    }

    /// The annual rate (bps) for an exact tier duration.
    ///
    /// # Errors
    /// `UnsupportedDuration` if no tier has exactly this duration.
    pub fn rate_for(&self, duration_secs: u64) -> Result<u32, LedgerError> {
        self.tiers
            .binary_search_by_key(&duration_secs, |t| t.duration_secs)
            .map(|i| self.tiers[i].rate_bps)
            .map_err(|_| LedgerError::UnsupportedDuration { duration_secs })
    }

    /// Tiers ordered by duration.
    pub fn tiers(&self) -> &[AprTier] {
        &self.tiers
    }

    /// Accepted lock durations in seconds, ascending.
    pub fn durations(&self) -> impl Iterator<Item = u64> + '_ {
        self.tiers.iter().map(|t| t.duration_secs)
    }
}

impl Default for AprSchedule {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

impl TryFrom<Vec<AprTier>> for AprSchedule {
    type Error = LedgerError;

    fn try_from(tiers: Vec<AprTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<AprSchedule> for Vec<AprTier> {
    fn from(schedule: AprSchedule) -> Self {
        schedule.tiers
    }
}
