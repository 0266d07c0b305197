use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LedgerBackend {
    /// HTTP contract relay that signs and submits transactions
    Relay,
    /// In-process ledger for local runs; state is lost on restart
    #[default]
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub backend: LedgerBackend,
    /// Relay base URL (required for the relay backend)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_contract_address() -> String {
    "0x0000000000000000000000000000000000000000".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            endpoint: None,
            api_key: None,
            contract_address: default_contract_address(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
