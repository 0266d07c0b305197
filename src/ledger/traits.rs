use crate::error::LedgerError;
use crate::pipeline::SubmissionRequest;
use std::future::Future;
use std::pin::Pin;

pub type LedgerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, LedgerError>> + Send + 'a>>;

/// System of record for reward claims.
///
/// `validate_submission` must succeed before `register_submission` is
/// attempted. Registration distinguishes a failed call (`Err`) from a call
/// the ledger executed but did not confirm (`Ok(false)`).
pub trait RewardLedger: Send + Sync {
    /// Backend identifier (e.g. "relay", "memory").
    fn name(&self) -> &str;

    fn validate_submission<'a>(&'a self, request: &'a SubmissionRequest) -> LedgerFuture<'a, ()>;

    fn register_submission<'a>(&'a self, request: &'a SubmissionRequest)
    -> LedgerFuture<'a, bool>;
}
