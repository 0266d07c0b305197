use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BagType {
    Recyclable,
    NonRecyclable,
    NotDetected,
}

impl BagType {
    /// Lenient mapping of model output; unknown labels count as not detected.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "recyclable" | "reusable" | "paper" | "cloth" => Self::Recyclable,
            "non_recyclable" | "nonrecyclable" | "not_recyclable" | "plastic" => {
                Self::NonRecyclable
            }
            _ => Self::NotDetected,
        }
    }

    #[must_use]
    pub fn is_recyclable(self) -> bool {
        self == Self::Recyclable
    }
}

/// Structured result of one classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub bag_type: BagType,
    pub receipt_detected: bool,
    pub receipt_valid: bool,
    pub confidence_score: f64,
    pub explanation: String,
}

impl ClassificationVerdict {
    /// Build a verdict with its invariants applied: the confidence is clamped
    /// into `[0, 1]` and an undetected receipt is never valid.
    #[must_use]
    pub fn new(
        bag_type: BagType,
        receipt_detected: bool,
        receipt_valid: bool,
        confidence_score: f64,
        explanation: impl Into<String>,
    ) -> Self {
        let confidence_score = if confidence_score.is_finite() {
            confidence_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            bag_type,
            receipt_detected,
            receipt_valid: receipt_detected && receipt_valid,
            confidence_score,
            explanation: explanation.into(),
        }
    }
}
