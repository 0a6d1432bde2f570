// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::mailer_version;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CampaignResult;
use crate::modules::llm::{ChatRequest, TextGenerator};
use crate::modules::settings::cli::SETTINGS;
use crate::raise_error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> CampaignResult<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("campaign-mailer/{}", mailer_version!()))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_settings() -> CampaignResult<Option<Self>> {
        let Some(api_key) = SETTINGS
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        else {
            return Ok(None);
        };
        Self::new(
            &SETTINGS.openai_base_url,
            api_key,
            SETTINGS.openai_model.clone(),
            Duration::from_secs(SETTINGS.openai_timeout_secs),
        )
        .map(Some)
    }
}

impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &ChatRequest) -> CampaignResult<String> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let code = if e.is_timeout() {
                    ErrorCode::ConnectionTimeout
                } else {
                    ErrorCode::LlmRequestFailed
                };
                raise_error!(format!("Language model request failed: {:#?}", e), code)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(raise_error!(
                format!("Language model returned {}: {}", status, body),
                ErrorCode::LlmRequestFailed
            ));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            raise_error!(
                format!("Unreadable language model response: {:#?}", e),
                ErrorCode::LlmResponseInvalid
            )
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                raise_error!(
                    "Language model returned no content".into(),
                    ErrorCode::LlmResponseInvalid
                )
            })?;
        debug!("Language model returned {} characters", text.len());
        Ok(text)
    }
}
