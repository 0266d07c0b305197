use crate::classifier::{BagType, ClassificationVerdict};
use crate::error::LedgerError;
use strum::AsRefStr;

/// Terminal branch of the submission guard chain.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
    NoReceipt,
    InvalidReceipt,
    NotRecyclable,
    ValidationRejected(LedgerError),
    RegistrationFailed(LedgerError),
    RegistrationUnconfirmed,
    Rewarded,
}

impl Decision {
    /// Local guards, cheapest first. `None` means the ledger must be consulted.
    pub fn from_verdict(verdict: &ClassificationVerdict) -> Option<Self> {
        if !verdict.receipt_detected {
            Some(Self::NoReceipt)
        } else if !verdict.receipt_valid {
            Some(Self::InvalidReceipt)
        } else if !verdict.bag_type.is_recyclable() {
            Some(Self::NotRecyclable)
        } else {
            None
        }
    }

    pub fn eligible_for_rewards(&self) -> bool {
        matches!(self, Self::Rewarded)
    }

    /// True for the branches where a ledger call was attempted.
    pub fn reached_ledger(&self) -> bool {
        matches!(
            self,
            Self::ValidationRejected(_)
                | Self::RegistrationFailed(_)
                | Self::RegistrationUnconfirmed
                | Self::Rewarded
        )
    }

    pub fn message(&self, bag_type: BagType) -> String {
        match self {
            Self::NoReceipt => {
                "No receipt detected in the image. Please ensure the receipt is clearly visible."
                    .into()
            }
            Self::InvalidReceipt => {
                "Receipt detected, but the date is incorrect. Please submit a receipt from today."
                    .into()
            }
            Self::NotRecyclable if bag_type == BagType::NonRecyclable => {
                "Plastic bags are not eligible for rewards.".into()
            }
            Self::NotRecyclable => "Only recyclable bags are eligible for rewards.".into(),
            Self::ValidationRejected(error) => {
                format!("Smart contract validation error: {}", error.message())
            }
            Self::RegistrationFailed(error) => {
                format!("Smart contract submission error: {}", error.message())
            }
            Self::RegistrationUnconfirmed => {
                "Transaction failed: Smart contract did not confirm submission.".into()
            }
            Self::Rewarded => "Submission accepted! You earned rewards.".into(),
        }
    }

    /// Replaces the classifier's explanation on ledger failures.
    pub fn explanation_override(&self) -> Option<&'static str> {
        match self {
            Self::ValidationRejected(_) => {
                Some("Smart contract validation failed. Please try again.")
            }
            Self::RegistrationFailed(_) => {
                Some("Smart contract registration failed. Please try again.")
            }
            Self::RegistrationUnconfirmed => {
                Some("Smart contract did not confirm the transaction. Please try again.")
            }
            _ => None,
        }
    }
}
