mod classifier;
mod core;
mod gateway;
mod ledger;
mod observability;

pub use classifier::ClassifierConfig;
pub(crate) use core::MAX_UTC_OFFSET_MINUTES;
pub use core::Config;
pub use gateway::GatewayConfig;
pub use ledger::{LedgerBackend, LedgerConfig};
pub use observability::ObservabilityConfig;
