// crates/nectr-core/src/amount.rs
//
// NECTR token amounts.
//
// The token uses 18 decimals. All internal accounting is done in integer
// smallest units (`Amount`) to keep the ledger exact; `Nectr` exists for
// display and for converting human-entered values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::NectrError;

/// Number of decimal places of the NECTR token.
pub const DECIMALS: u32 = 18;

/// Number of smallest units in one NECTR. 1 NECTR = 10^18 units.
pub const UNITS_PER_NECTR: u128 = 10u128.pow(DECIMALS);

/// Type alias for an amount in smallest units.
pub type Amount = u128;

/// A NECTR amount, wrapping its value in smallest units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Nectr {
    /// Amount in smallest units (1 NECTR = 10^18 units).
    #[serde(with = "as_string")]
    pub units: Amount,
}

impl Nectr {
    /// Create an amount from a number of whole NECTR.
    ///
    /// # Example
    /// ```
    /// use nectr_core::amount::{Nectr, UNITS_PER_NECTR};
    /// assert_eq!(Nectr::from_whole(3).units, 3 * UNITS_PER_NECTR);
    /// ```
    pub const fn from_whole(whole: u128) -> Self {
        Self {
            units: whole * UNITS_PER_NECTR,
        }
    }

    /// Create an amount from smallest units.
    pub const fn from_units(units: Amount) -> Self {
        Self { units }
    }

    /// Returns zero NECTR.
    pub const fn zero() -> Self {
        Self { units: 0 }
    }
}

impl Add for Nectr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            units: self.units.saturating_add(rhs.units),
        }
    }
}

impl Sub for Nectr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            units: self.units.saturating_sub(rhs.units),
        }
    }
}

impl fmt::Display for Nectr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.units / UNITS_PER_NECTR;
        let frac = self.units % UNITS_PER_NECTR;
        if frac == 0 {
            write!(f, "{} NECTR", whole)
        } else {
            let frac_str = format!("{:018}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{} NECTR", whole, trimmed)
        }
    }
}

/// Parse a human-entered NECTR value ("100", "1.5", ".25") into smallest
/// units without going through floating point.
pub fn parse_nectr(input: &str) -> Result<Amount, NectrError> {
    let s = input.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(NectrError::InvalidInput(format!(
            "{:?} is not a NECTR amount",
            input
        )));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(NectrError::InvalidInput(format!(
            "{:?} is not a NECTR amount",
            input
        )));
    }
    if frac.len() > DECIMALS as usize {
        return Err(NectrError::InvalidInput(format!(
            "{:?} has more than {} decimal places",
            input, DECIMALS
        )));
    }

    let overflow = || NectrError::InvalidInput(format!("{:?} is too large", input));

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(UNITS_PER_NECTR)
            .ok_or_else(overflow)?
    };
    let frac_units = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    whole_units.checked_add(frac_units).ok_or_else(overflow)
}

/// Serde adapter that writes an `Amount` as a decimal string.
///
/// Amounts routinely exceed 2^64, which JSON consumers and
/// `serde_json::Value` cannot hold as numbers.
pub mod as_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_per_nectr() {
        assert_eq!(UNITS_PER_NECTR, 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_from_whole() {
        assert_eq!(Nectr::from_whole(1).units, UNITS_PER_NECTR);
        assert_eq!(Nectr::from_whole(0), Nectr::zero());
    }

    #[test]
    fn test_add_and_saturating_sub() {
        let a = Nectr::from_whole(1);
        let b = Nectr::from_whole(2);
        assert_eq!((a + b).units, 3 * UNITS_PER_NECTR);
        assert_eq!((a - b).units, 0);
    }

    #[test]
    fn test_display_whole() {
        assert_eq!(Nectr::from_whole(42).to_string(), "42 NECTR");
    }

    #[test]
    fn test_display_fractional() {
        let amount = Nectr::from_units(UNITS_PER_NECTR + UNITS_PER_NECTR / 2);
        assert_eq!(amount.to_string(), "1.5 NECTR");
    }

    #[test]
    fn test_display_smallest_unit() {
        assert_eq!(Nectr::from_units(1).to_string(), "0.000000000000000001 NECTR");
    }

    #[test]
    fn test_parse_whole_and_fraction() {
        assert_eq!(parse_nectr("100").unwrap(), 100 * UNITS_PER_NECTR);
        assert_eq!(parse_nectr("1.5").unwrap(), 3 * UNITS_PER_NECTR / 2);
        assert_eq!(parse_nectr(".25").unwrap(), UNITS_PER_NECTR / 4);
        assert_eq!(parse_nectr(" 7. ").unwrap(), 7 * UNITS_PER_NECTR);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_nectr("").is_err());
        assert!(parse_nectr(".").is_err());
        assert!(parse_nectr("-1").is_err());
        assert!(parse_nectr("1e6").is_err());
        assert!(parse_nectr("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(parse_nectr("340282366920938463463375").is_err());
    }

    #[test]
    fn test_nectr_serializes_units_as_string() {
        let amount = Nectr::from_whole(2_000_000_000);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "{\"units\":\"2000000000000000000000000000\"}");
        let back: Nectr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
