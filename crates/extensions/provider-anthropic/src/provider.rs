//! Anthropic answer provider.

use std::time::Duration;

use async_trait::async_trait;
use jobfill_config::AiConfig;
use jobfill_protocols::{AiAnswer, AnswerProvider, Profile, ProviderError, Question};
use tracing::{debug, info, warn};

use crate::api::{ApiMessage, ApiRequest, ApiResponse};
use crate::prompt::{SYSTEM_PROMPT, parse_answers, user_message};

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    applicant: Option<String>,
}

impl AnthropicProvider {
    pub fn new(api_key: String, base_url: String, model: String, max_tokens: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
            client,
            applicant: None,
        }
    }

    /// Build from the `[ai]` section; fails unless it is enabled with a key.
    pub fn from_config(config: &AiConfig) -> Result<Self, ProviderError> {
        if !config.is_usable() {
            return Err(ProviderError::NotConfigured(
                "ai.enabled is false or ai.api_key is empty".to_string(),
            ));
        }
        let api_key = config.api_key.clone().unwrap_or_default();
        Ok(Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.max_tokens,
        ))
    }

    /// Give the model the applicant's non-demographic background.
    pub fn with_applicant(mut self, profile: &Profile) -> Self {
        let background = serde_json::json!({
            "identity": profile.identity,
            "contact": {
                "city": profile.contact.city,
                "state": profile.contact.state,
                "country": profile.contact.country,
            },
            "professional": profile.professional,
            "education": profile.education,
        });
        self.applicant = serde_json::to_string_pretty(&background).ok();
        self
    }

    fn build_request(&self, questions: &[Question]) -> Result<ApiRequest, ProviderError> {
        Ok(ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(user_message(questions, self.applicant.as_deref())?)],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(0.2),
        })
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<ApiResponse, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(REQUEST_TIMEOUT_SECS)
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), error_message(body), retry_after));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }
}

/// The `error.message` of an API error body, or the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(body)
}

#[async_trait]
impl AnswerProvider for AnthropicProvider {
    fn id(&self) -> &str {
        "anthropic"
    }

    async fn answer_questions(&self, questions: &[Question]) -> Result<Vec<AiAnswer>, ProviderError> {
        if questions.is_empty() {
            return Ok(Vec::new());
        }
        info!("Asking {} for {} answers", self.model, questions.len());
        let request = self.build_request(questions)?;
        let response = self.send_request(&request).await?;
        if response.truncated() {
            warn!("Reply hit max_tokens ({}); parsing what arrived", self.max_tokens);
        }
        let answers = parse_answers(&response.text())?;
        debug!("Received {} answers", answers.len());
        Ok(answers)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
