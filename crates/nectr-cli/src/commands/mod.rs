// crates/nectr-cli/src/commands/mod.rs
//
// Command module declarations for the NECTR CLI.

pub mod account;
pub mod info;
pub mod stake;

use nectr_core::{parse_nectr, Amount, NectrError};

/// clap value parser for NECTR amounts given as whole or decimal NECTR.
pub fn parse_amount(s: &str) -> Result<Amount, NectrError> {
    parse_nectr(s)
}
