// crates/nectr-core/src/lib.rs
//
// nectr-core: Core types, errors, and time primitives for the Nectr staking
// ledger.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account identifiers, token amounts, the clock abstraction, and
// the error enums shared by the engine, the RPC layer, and the tooling.

pub mod amount;
pub mod error;
pub mod identity;
pub mod time;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use nectr_core::AccountId;`

pub use amount::{parse_nectr, Amount, Nectr, DECIMALS, UNITS_PER_NECTR};
pub use error::{LedgerError, NectrError};
pub use identity::AccountId;
pub use time::{
    Clock, ManualClock, MonotonicClock, SystemClock, Timestamp, SECONDS_PER_DAY,
    SECONDS_PER_YEAR,
};
