use super::Config;
use crate::error::ConfigError;

fn env_non_empty(primary: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(primary)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            fallback
                .and_then(|name| std::env::var(name).ok())
                .filter(|value| !value.trim().is_empty())
        })
}

impl Config {
    /// Overlay non-empty environment variables. An unparseable
    /// `ECOEARN_LEDGER_BACKEND` is an error rather than silently ignored.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(key) = env_non_empty("ECOEARN_CLASSIFIER_API_KEY", Some("OPENAI_API_KEY")) {
            self.classifier.api_key = Some(key);
        }

        if let Some(model) = env_non_empty("ECOEARN_CLASSIFIER_MODEL", None) {
            self.classifier.model = model;
        }

        if let Some(base_url) = env_non_empty("ECOEARN_CLASSIFIER_BASE_URL", None) {
            self.classifier.base_url = base_url;
        }

        if let Some(host) = env_non_empty("ECOEARN_HOST", Some("HOST")) {
            self.gateway.host = host;
        }

        if let Some(port_str) = env_non_empty("ECOEARN_PORT", Some("PORT"))
            && let Ok(port) = port_str.trim().parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(origins) = env_non_empty("ECOEARN_CORS_ORIGINS", Some("ORIGIN")) {
            self.gateway.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }

        if let Some(backend) = env_non_empty("ECOEARN_LEDGER_BACKEND", None) {
            self.ledger.backend = backend.trim().parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "ECOEARN_LEDGER_BACKEND `{backend}` is not a ledger backend (expected `relay` or `memory`)"
                ))
            })?;
        }

        if let Some(endpoint) = env_non_empty("ECOEARN_LEDGER_ENDPOINT", None) {
            self.ledger.endpoint = Some(endpoint);
        }

        if let Some(key) = env_non_empty("ECOEARN_LEDGER_API_KEY", None) {
            self.ledger.api_key = Some(key);
        }

        if let Some(address) = env_non_empty("ECOEARN_CONTRACT_ADDRESS", None) {
            self.ledger.contract_address = address;
        }

        if let Some(level) = env_non_empty("ECOEARN_LOG_LEVEL", None) {
            self.observability.log_level = level;
        }

        Ok(())
    }
}
