use super::traits::{LedgerFuture, RewardLedger};
use crate::error::LedgerError;
use crate::pipeline::SubmissionRequest;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// In-process ledger: one reward per device and per wallet per UTC day.
///
/// State lives only as long as the process.
#[derive(Default)]
pub struct MemoryLedger {
    claims: Mutex<Claims>,
}

#[derive(Default)]
struct Claims {
    devices: HashSet<(NaiveDate, String)>,
    wallets: HashSet<(NaiveDate, String)>,
}

impl Claims {
    fn conflict(&self, day: NaiveDate, request: &SubmissionRequest) -> Option<&'static str> {
        if self
            .devices
            .contains(&(day, request.device_id().to_string()))
        {
            return Some("This device has already submitted a receipt today.");
        }
        if self
            .wallets
            .contains(&(day, request.address().to_ascii_lowercase()))
        {
            return Some("This wallet has already claimed a reward today.");
        }
        None
    }

    /// Forget claims from days before `today`; only the current day can conflict.
    fn prune_before(&mut self, today: NaiveDate) {
        self.devices.retain(|(day, _)| *day >= today);
        self.wallets.retain(|(day, _)| *day >= today);
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained device claims.
    pub fn claim_count(&self) -> usize {
        self.claims
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .devices
            .len()
    }
}

impl RewardLedger for MemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    fn validate_submission<'a>(&'a self, request: &'a SubmissionRequest) -> LedgerFuture<'a, ()> {
        Box::pin(async move {
            let claims = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
            match claims.conflict(request.utc_day(), request) {
                Some(message) => Err(LedgerError::Validation {
                    ledger: self.name().to_string(),
                    message: message.to_string(),
                }),
                None => Ok(()),
            }
        })
    }

    fn register_submission<'a>(
        &'a self,
        request: &'a SubmissionRequest,
    ) -> LedgerFuture<'a, bool> {
        Box::pin(async move {
            let day = request.utc_day();
            let mut claims = self.claims.lock().unwrap_or_else(PoisonError::into_inner);
            // A concurrent request may have registered since validation.
            if let Some(message) = claims.conflict(day, request) {
                return Err(LedgerError::Registration {
                    ledger: self.name().to_string(),
                    message: message.to_string(),
                });
            }
            claims.prune_before(day);
            claims
                .devices
                .insert((day, request.device_id().to_string()));
            claims
                .wallets
                .insert((day, request.address().to_ascii_lowercase()));
            tracing::debug!(
                address = request.address(),
                device_id = request.device_id(),
                %day,
                "claim recorded in memory ledger"
            );
            Ok(true)
        })
    }
}
