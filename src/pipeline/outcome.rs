use super::decision::Decision;
use crate::classifier::{BagType, ClassificationVerdict};
use serde::{Deserialize, Serialize};

/// The one response shape returned for every terminal branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub message: String,
    pub bag_type: BagType,
    pub confidence_score: f64,
    pub receipt_detected: bool,
    pub receipt_valid: bool,
    pub eligible_for_rewards: bool,
    pub explanation: String,
}

impl SubmissionOutcome {
    pub fn new(decision: &Decision, verdict: &ClassificationVerdict) -> Self {
        Self {
            message: decision.message(verdict.bag_type),
            bag_type: verdict.bag_type,
            confidence_score: verdict.confidence_score,
            receipt_detected: verdict.receipt_detected,
            receipt_valid: verdict.receipt_valid,
            eligible_for_rewards: decision.eligible_for_rewards(),
            explanation: decision
                .explanation_override()
                .map_or_else(|| verdict.explanation.clone(), ToOwned::to_owned),
        }
    }
}
