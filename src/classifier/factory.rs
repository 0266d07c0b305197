use super::client::ReceiptClassifier;
use super::openai::{OpenAiVisionOptions, OpenAiVisionProvider};
use super::traits::VisionProvider;
use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// Build the vision provider named by `classifier.provider`.
pub fn create_vision_provider(config: &Config) -> anyhow::Result<Arc<dyn VisionProvider>> {
    let classifier = &config.classifier;
    let api_key = config.classifier_api_key();

    match classifier.provider.trim().to_ascii_lowercase().as_str() {
        "openai" => {
            if api_key.is_none() {
                tracing::warn!(
                    "no classifier API key configured; submissions will fail until OPENAI_API_KEY is set"
                );
            }
            Ok(Arc::new(OpenAiVisionProvider::new(&OpenAiVisionOptions {
                base_url: &classifier.base_url,
                api_key: api_key.as_deref(),
                model: &classifier.model,
                temperature: classifier.temperature,
                max_tokens: classifier.max_tokens,
                timeout_secs: classifier.timeout_secs,
            })))
        }
        other => anyhow::bail!("Unknown classifier provider: {other}. Supported: openai"),
    }
}

/// Provider plus client settings from config.
pub fn create_classifier(config: &Config) -> anyhow::Result<ReceiptClassifier> {
    let provider = create_vision_provider(config)?;
    Ok(
        ReceiptClassifier::new(provider, Duration::from_secs(config.classifier.timeout_secs))
            .with_default_utc_offset(config.classifier.utc_offset_minutes),
    )
}
