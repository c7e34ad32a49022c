// crates/nectr-ledger/src/lib.rs
//
// nectr-ledger: the staking ledger and rewards engine behind the NECTR
// dashboard.
//
// All monetary values are tracked in smallest units (1 NECTR = 10^18).
// State lives in an explicit `LedgerState` value; nothing here reads a clock
// or touches global state, so every operation is replayable from its inputs.

pub mod apr;
pub mod mint;
pub mod operation;
pub mod positions;
pub mod snapshot;
pub mod staking;
pub mod state;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use apr::{AprSchedule, AprTier, BPS_DENOMINATOR};
pub use mint::MintPolicy;
pub use operation::{BalanceView, Operation, Outcome, Query, QueryResult};
pub use positions::{Position, PositionId, PositionStore};
pub use staking::{accrued_interest, PositionStatus, PositionView};
pub use state::{LedgerConfig, LedgerState, Stats};
pub use token::TokenLedger;
