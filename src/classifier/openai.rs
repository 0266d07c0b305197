//! OpenAI-compatible vision provider.
//! Works with any `/chat/completions` endpoint that accepts `image_url` parts.

use super::traits::{VisionFuture, VisionProvider};
use crate::error::ClassifierError;
use crate::media::EncodedImage;
use crate::providers::{build_provider_client, response_error_message};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OpenAiVisionProvider {
    name: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout_secs: u64,
    /// Pre-computed `Authorization` value.
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL.
    cached_chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrlContent },
}

#[derive(Debug, Serialize)]
struct ImageUrlContent {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Settings for [`OpenAiVisionProvider::new`].
#[derive(Debug, Clone)]
pub struct OpenAiVisionOptions<'a> {
    pub base_url: &'a str,
    pub api_key: Option<&'a str>,
    pub model: &'a str,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl OpenAiVisionProvider {
    pub fn new(options: &OpenAiVisionOptions<'_>) -> Self {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: "openai".to_string(),
            model: options.model.to_string(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            timeout_secs: options.timeout_secs,
            cached_auth_header: options
                .api_key
                .filter(|key| !key.trim().is_empty())
                .map(|key| format!("Bearer {key}")),
            cached_chat_url,
            client: build_provider_client(options.timeout_secs),
        }
    }

    fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }

    fn build_request(&self, prompt: &str, image: &EncodedImage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlContent {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn request_error(&self, message: impl Into<String>) -> ClassifierError {
        ClassifierError::Request {
            provider: self.name.clone(),
            message: message.into(),
        }
    }

    async fn call_chat_completions(
        &self,
        prompt: &str,
        image: &EncodedImage,
    ) -> Result<String, ClassifierError> {
        let auth_header = self.cached_auth_header.as_ref().ok_or_else(|| {
            self.request_error("API key not set. Set OPENAI_API_KEY or classifier.api_key.")
        })?;

        let request = self.build_request(prompt, image);
        let response = self
            .client
            .post(self.chat_completions_url())
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ClassifierError::Timeout {
                        secs: self.timeout_secs,
                    }
                } else {
                    self.request_error(format!("request failed: {}", error.without_url()))
                }
            })?;

        if !response.status().is_success() {
            return Err(self.request_error(response_error_message(response).await));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|error| self.request_error(format!("response JSON decode failed: {error}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ClassifierError::EmptyResponse {
                provider: self.name.clone(),
            })
    }
}

impl VisionProvider for OpenAiVisionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe_image<'a>(&'a self, prompt: &'a str, image: &'a EncodedImage) -> VisionFuture<'a> {
        Box::pin(self.call_chat_completions(prompt, image))
    }
}
