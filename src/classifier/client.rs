use super::parse::parse_verdict;
use super::prompt::build_prompt;
use super::traits::VisionProvider;
use super::types::ClassificationVerdict;
use crate::config::schema::MAX_UTC_OFFSET_MINUTES;
use crate::error::{ClassifierError, InputError, Result};
use crate::media::decode_image;
use chrono::{FixedOffset, Local, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Classifier client shared by all requests; holds no per-request state.
#[derive(Clone)]
pub struct ReceiptClassifier {
    provider: Arc<dyn VisionProvider>,
    timeout: Duration,
    default_utc_offset_minutes: Option<i32>,
}

impl ReceiptClassifier {
    pub fn new(provider: Arc<dyn VisionProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            default_utc_offset_minutes: None,
        }
    }

    #[must_use]
    pub fn with_default_utc_offset(mut self, minutes: Option<i32>) -> Self {
        self.default_utc_offset_minutes = minutes;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Calendar date the receipt must carry.
    ///
    /// Caller offset first, then the configured offset, then the server's
    /// local zone.
    pub fn today(&self, caller_utc_offset_minutes: Option<i32>) -> Result<NaiveDate> {
        match caller_utc_offset_minutes.or(self.default_utc_offset_minutes) {
            Some(minutes) => Ok(date_at_offset(minutes)?),
            None => Ok(Local::now().date_naive()),
        }
    }

    /// Classify against the server-side notion of "today".
    pub async fn classify(&self, image_base64: &str) -> Result<ClassificationVerdict> {
        let today = self.today(None)?;
        self.classify_on(image_base64, today).await
    }

    /// Classify an uploaded image, judging receipt validity against `today`.
    pub async fn classify_on(
        &self,
        image_base64: &str,
        today: NaiveDate,
    ) -> Result<ClassificationVerdict> {
        let image = decode_image(image_base64)?;
        let prompt = build_prompt(today);

        tracing::debug!(
            provider = self.provider.name(),
            format = image.format.mime_type(),
            size_bytes = image.size_bytes,
            %today,
            "sending image to classifier"
        );

        let answer = tokio::time::timeout(
            self.timeout,
            self.provider.describe_image(&prompt, &image),
        )
        .await
        .map_err(|_| ClassifierError::Timeout {
            secs: self.timeout.as_secs(),
        })??;

        if answer.trim().is_empty() {
            return Err(ClassifierError::EmptyResponse {
                provider: self.provider.name().to_string(),
            }
            .into());
        }

        let verdict = parse_verdict(&answer).inspect_err(|error| {
            tracing::warn!(
                provider = self.provider.name(),
                %error,
                answer_chars = answer.chars().count(),
                "classifier answer could not be parsed"
            );
        })?;
        Ok(verdict)
    }
}

fn date_at_offset(minutes: i32) -> std::result::Result<NaiveDate, InputError> {
    if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        return Err(InputError::InvalidUtcOffset(minutes));
    }
    let offset = FixedOffset::east_opt(minutes * 60).ok_or(InputError::InvalidUtcOffset(minutes))?;
    Ok(Utc::now().with_timezone(&offset).date_naive())
}
