use super::memory::MemoryLedger;
use super::relay::RelayLedger;
use super::traits::RewardLedger;
use crate::config::{LedgerBackend, LedgerConfig};
use std::sync::Arc;

/// Build the ledger backend named by `ledger.backend`.
pub fn create_ledger(config: &LedgerConfig) -> anyhow::Result<Arc<dyn RewardLedger>> {
    match config.backend {
        LedgerBackend::Memory => {
            tracing::warn!("using in-memory ledger; claims are lost on restart");
            Ok(Arc::new(MemoryLedger::new()))
        }
        LedgerBackend::Relay => {
            let endpoint = config
                .endpoint
                .as_deref()
                .map(str::trim)
                .filter(|endpoint| !endpoint.is_empty())
                .ok_or_else(|| anyhow::anyhow!("ledger.endpoint is required for the relay backend"))?;
            Ok(Arc::new(RelayLedger::new(
                endpoint,
                &config.contract_address,
                config.api_key.as_deref(),
                config.timeout_secs,
            )))
        }
    }
}
