use crate::config::schema::MAX_UTC_OFFSET_MINUTES;
use crate::error::InputError;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// One reward claim, fixed at the moment the gateway accepted it.
#[derive(Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    image: String,
    address: String,
    device_id: String,
    timestamp: i64,
    utc_offset_minutes: Option<i32>,
}

impl SubmissionRequest {
    /// Validate caller fields and stamp the request with the current time.
    pub fn new(
        image: String,
        address: &str,
        device_id: &str,
        utc_offset_minutes: Option<i32>,
    ) -> Result<Self, InputError> {
        Self::received_at(
            image,
            address,
            device_id,
            utc_offset_minutes,
            Utc::now().timestamp_millis(),
        )
    }

    /// Like [`SubmissionRequest::new`] with an explicit epoch-millis timestamp.
    pub fn received_at(
        image: String,
        address: &str,
        device_id: &str,
        utc_offset_minutes: Option<i32>,
        timestamp: i64,
    ) -> Result<Self, InputError> {
        let address = address.trim();
        if !is_wallet_address(address) {
            return Err(InputError::InvalidAddress);
        }

        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(InputError::MissingDeviceId);
        }

        if let Some(minutes) = utc_offset_minutes
            && !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes)
        {
            return Err(InputError::InvalidUtcOffset(minutes));
        }

        Ok(Self {
            image,
            address: address.to_string(),
            device_id: device_id.to_string(),
            timestamp,
            utc_offset_minutes,
        })
    }

    /// Base64 payload as uploaded.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Epoch milliseconds at receipt.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn utc_offset_minutes(&self) -> Option<i32> {
        self.utc_offset_minutes
    }

    /// UTC calendar day of the timestamp.
    pub fn utc_day(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
            .unwrap_or_default()
            .date_naive()
    }
}

// The image can be megabytes of base64; keep it out of logs.
impl fmt::Debug for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionRequest")
            .field("image", &format_args!("<{} base64 chars>", self.image.len()))
            .field("address", &self.address)
            .field("device_id", &self.device_id)
            .field("timestamp", &self.timestamp)
            .field("utc_offset_minutes", &self.utc_offset_minutes)
            .finish()
    }
}

fn is_wallet_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
