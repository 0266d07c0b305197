//! HTTP contract relay.
//! The relay holds the signing key and exposes one POST per contract method.

use super::traits::{LedgerFuture, RewardLedger};
use crate::error::LedgerError;
use crate::pipeline::SubmissionRequest;
use crate::providers::{build_provider_client, sanitize_api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct RelayLedger {
    validate_url: String,
    register_url: String,
    cached_auth_header: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionBody<'a> {
    address: &'a str,
    device_id: &'a str,
    timestamp: i64,
}

impl<'a> From<&'a SubmissionRequest> for SubmissionBody<'a> {
    fn from(request: &'a SubmissionRequest) -> Self {
        Self {
            address: request.address(),
            device_id: request.device_id(),
            timestamp: request.timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    #[serde(default)]
    confirmed: bool,
    #[serde(default)]
    tx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone, Copy)]
enum Method {
    Validate,
    Register,
}

impl Method {
    fn error(self, message: String) -> LedgerError {
        let ledger = "relay".to_string();
        match self {
            Self::Validate => LedgerError::Validation { ledger, message },
            Self::Register => LedgerError::Registration { ledger, message },
        }
    }
}

impl RelayLedger {
    pub fn new(
        endpoint: &str,
        contract_address: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Self {
        let base = format!(
            "{}/contracts/{}",
            endpoint.trim_end_matches('/'),
            contract_address.trim()
        );
        Self {
            validate_url: format!("{base}/validateSubmission"),
            register_url: format!("{base}/registerSubmission"),
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(|key| format!("Bearer {key}")),
            client: build_provider_client(timeout_secs),
        }
    }

    async fn post(
        &self,
        method: Method,
        request: &SubmissionRequest,
    ) -> Result<reqwest::Response, LedgerError> {
        let url = match method {
            Method::Validate => &self.validate_url,
            Method::Register => &self.register_url,
        };
        let mut builder = self
            .client
            .post(url)
            .json(&SubmissionBody::from(request));
        if let Some(auth) = &self.cached_auth_header {
            builder = builder.header("Authorization", auth);
        }

        let response = builder.send().await.map_err(|error| {
            let error = error.without_url();
            if error.is_timeout() {
                method.error("relay did not answer in time".into())
            } else {
                method.error(format!("relay request failed: {error}"))
            }
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(method.error(relay_error_message(status, &body)))
    }
}

/// Prefer the relay's own `message`/`error` text over the raw body.
fn relay_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let structured = serde_json::from_str::<RelayErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .filter(|message| !message.trim().is_empty());

    match structured {
        Some(message) => sanitize_api_error(message.trim()),
        None if body.trim().is_empty() => format!("relay returned {status}"),
        None => format!("{status}: {}", sanitize_api_error(body.trim())),
    }
}

impl RewardLedger for RelayLedger {
    fn name(&self) -> &str {
        "relay"
    }

    fn validate_submission<'a>(&'a self, request: &'a SubmissionRequest) -> LedgerFuture<'a, ()> {
        Box::pin(async move {
            self.post(Method::Validate, request).await?;
            Ok(())
        })
    }

    fn register_submission<'a>(
        &'a self,
        request: &'a SubmissionRequest,
    ) -> LedgerFuture<'a, bool> {
        Box::pin(async move {
            let response = self.post(Method::Register, request).await?;
            let parsed: RegisterResponse = response.json().await.map_err(|error| {
                Method::Register.error(format!("relay response JSON decode failed: {error}"))
            })?;

            if parsed.confirmed {
                tracing::info!(
                    tx_id = parsed.tx_id.as_deref().unwrap_or("-"),
                    address = request.address(),
                    "submission registered"
                );
            } else {
                tracing::warn!(address = request.address(), "relay did not confirm submission");
            }
            Ok(parsed.confirmed)
        })
    }
}
