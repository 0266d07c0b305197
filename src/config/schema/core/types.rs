use super::super::{
    ClassifierConfig, GatewayConfig, LedgerBackend, LedgerConfig, ObservabilityConfig,
};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest real-world offset (UTC+14 / UTC-12 fits inside).
pub(crate) const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

pub(super) fn default_config_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".ecoearn")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_dir().join("config.toml"),
            gateway: GatewayConfig::default(),
            classifier: ClassifierConfig::default(),
            ledger: LedgerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.gateway.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "gateway.max_body_bytes must be greater than 0".into(),
            ));
        }
        if !self.classifier.provider.trim().eq_ignore_ascii_case("openai") {
            return Err(ConfigError::Validation(format!(
                "classifier.provider `{}` is not supported (expected `openai`)",
                self.classifier.provider
            )));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "classifier.timeout_secs must be greater than 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.classifier.temperature) {
            return Err(ConfigError::Validation(format!(
                "classifier.temperature must be within [0, 2], got {}",
                self.classifier.temperature
            )));
        }
        if let Some(offset) = self.classifier.utc_offset_minutes
            && !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&offset)
        {
            return Err(ConfigError::Validation(format!(
                "classifier.utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES}, got {offset}"
            )));
        }
        if self.ledger.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "ledger.timeout_secs must be greater than 0".into(),
            ));
        }
        let call_budget = self
            .classifier
            .timeout_secs
            .saturating_add(self.ledger.timeout_secs.saturating_mul(2));
        if self.gateway.request_timeout_secs <= call_budget {
            return Err(ConfigError::Validation(format!(
                "gateway.request_timeout_secs ({}) must exceed classifier.timeout_secs + 2 * ledger.timeout_secs ({call_budget})",
                self.gateway.request_timeout_secs
            )));
        }
        if self.ledger.backend == LedgerBackend::Relay
            && self
                .ledger
                .endpoint
                .as_deref()
                .is_none_or(|endpoint| endpoint.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "ledger.endpoint is required when ledger.backend = \"relay\"".into(),
            ));
        }
        Ok(())
    }

    /// API key for the classifier; config value first, then `OPENAI_API_KEY`.
    pub fn classifier_api_key(&self) -> Option<String> {
        self.classifier
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| {
                std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}
