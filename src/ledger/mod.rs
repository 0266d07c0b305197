//! Reward Ledger Client.
//!
//! Two contract operations, `validateSubmission` then `registerSubmission`,
//! behind the [`RewardLedger`] trait so the pipeline can be tested with
//! stand-ins.

pub mod factory;
pub mod memory;
pub mod relay;
pub mod traits;

pub use factory::create_ledger;
pub use memory::MemoryLedger;
pub use relay::RelayLedger;
pub use traits::{LedgerFuture, RewardLedger};
