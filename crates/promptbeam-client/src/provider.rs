// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Provider abstraction for different LM backends

use crate::lm::LmConfig;
use crate::request::ChatRequest;
use crate::response::{LmResponse, Usage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Type of LM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderType {
    /// OpenAI
    OpenAi,
    /// OpenAI-compatible endpoint
    Compatible,
    /// Custom provider
    Custom,
}

/// Provider trait for LM backends
#[async_trait]
pub trait Provider: Send + Sync {
    /// Complete a chat request
    async fn complete(
        &self,
        request: ChatRequest<'_>,
        config: &LmConfig,
    ) -> anyhow::Result<LmResponse>;

    /// Get provider type
    fn provider_type(&self) -> ProviderType;
}

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with custom base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(
        &self,
        request: ChatRequest<'_>,
        config: &LmConfig,
    ) -> anyhow::Result<LmResponse> {
        #[derive(Serialize)]
        struct OpenAiRequest<'a> {
            model: &'a str,
            messages: &'a [crate::request::Message<'a>],
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct OpenAiResponse {
            choices: Vec<Choice>,
            usage: Option<OpenAiUsage>,
            model: String,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: OpenAiMessage,
            finish_reason: Option<String>,
        }

        #[derive(Deserialize)]
        struct OpenAiMessage {
            content: String,
        }

        #[derive(Deserialize)]
        struct OpenAiUsage {
            prompt_tokens: u32,
            completion_tokens: u32,
            #[allow(dead_code)] // Present in API response but not currently used
            total_tokens: u32,
        }

        let req = OpenAiRequest {
            model: &config.model,
            messages: &request.messages,
            temperature: request.temperature.unwrap_or(config.temperature),
            max_tokens: request.max_tokens.unwrap_or(config.max_tokens),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<OpenAiResponse>()
            .await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        let mut lm_response = LmResponse::new(choice.message.content.clone(), response.model);

        if let Some(usage) = response.usage {
            lm_response =
                lm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        if let Some(reason) = &choice.finish_reason {
            lm_response = lm_response.with_finish_reason(reason.clone());
        }

        Ok(lm_response)
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type() {
        let provider = OpenAiProvider::new("test-key");
        assert_eq!(provider.provider_type(), ProviderType::OpenAi);
    }
}
