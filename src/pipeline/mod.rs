//! Submission Decision Pipeline.
//!
//! Turns a classifier verdict into exactly one [`Decision`], consulting the
//! reward ledger only when every local guard passes.

pub mod decision;
pub mod outcome;
pub mod request;

pub use decision::Decision;
pub use outcome::SubmissionOutcome;
pub use request::SubmissionRequest;

use crate::classifier::ClassificationVerdict;
use crate::error::LedgerError;
use crate::ledger::RewardLedger;
use std::sync::Arc;
use std::time::Duration;

/// Stateless across requests; the ledger handle is shared read-only.
#[derive(Clone)]
pub struct SubmissionPipeline {
    ledger: Arc<dyn RewardLedger>,
    call_timeout: Duration,
}

impl SubmissionPipeline {
    pub fn new(ledger: Arc<dyn RewardLedger>, call_timeout: Duration) -> Self {
        Self {
            ledger,
            call_timeout,
        }
    }

    pub fn ledger_name(&self) -> &str {
        self.ledger.name()
    }

    /// Run the guard chain; ledger failures become terminal decisions.
    pub async fn decide(
        &self,
        request: &SubmissionRequest,
        verdict: &ClassificationVerdict,
    ) -> Decision {
        if let Some(decision) = Decision::from_verdict(verdict) {
            return decision;
        }

        if let Err(error) = self.validate(request).await {
            tracing::warn!(
                ledger = self.ledger.name(),
                address = request.address(),
                %error,
                "ledger rejected submission"
            );
            return Decision::ValidationRejected(error);
        }

        match self.register(request).await {
            Ok(true) => Decision::Rewarded,
            Ok(false) => Decision::RegistrationUnconfirmed,
            Err(error) => {
                tracing::error!(
                    ledger = self.ledger.name(),
                    address = request.address(),
                    %error,
                    "ledger registration failed"
                );
                Decision::RegistrationFailed(error)
            }
        }
    }

    /// [`decide`](Self::decide) plus the response body for that decision.
    pub async fn evaluate(
        &self,
        request: &SubmissionRequest,
        verdict: &ClassificationVerdict,
    ) -> (Decision, SubmissionOutcome) {
        let decision = self.decide(request, verdict).await;
        let outcome = SubmissionOutcome::new(&decision, verdict);
        (decision, outcome)
    }

    async fn validate(&self, request: &SubmissionRequest) -> Result<(), LedgerError> {
        tokio::time::timeout(self.call_timeout, self.ledger.validate_submission(request))
            .await
            .unwrap_or_else(|_| {
                Err(LedgerError::Validation {
                    ledger: self.ledger.name().to_string(),
                    message: self.timeout_message(),
                })
            })
    }

    async fn register(&self, request: &SubmissionRequest) -> Result<bool, LedgerError> {
        tokio::time::timeout(self.call_timeout, self.ledger.register_submission(request))
            .await
            .unwrap_or_else(|_| {
                Err(LedgerError::Registration {
                    ledger: self.ledger.name().to_string(),
                    message: self.timeout_message(),
                })
            })
    }

    fn timeout_message(&self) -> String {
        format!(
            "ledger did not answer within {}s",
            self.call_timeout.as_secs()
        )
    }
}
