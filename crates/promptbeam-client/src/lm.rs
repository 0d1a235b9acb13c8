// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Language model client abstraction

use crate::provider::Provider;
use crate::request::ChatRequest;
use crate::response::LmResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for an LM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmConfig {
    /// Model name
    pub model: String,

    /// Default temperature when a request does not override it
    pub temperature: f32,

    /// Default max tokens when a request does not override it
    pub max_tokens: u32,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.0,
            max_tokens: 4000,
        }
    }
}

impl LmConfig {
    /// Create a config for a named model
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

/// Language model client trait
#[async_trait]
pub trait Lm: Send + Sync {
    /// Generate a chat completion
    async fn generate(&self, request: ChatRequest<'_>) -> anyhow::Result<LmResponse>;

    /// Get the model name
    fn model(&self) -> &str;
}

/// Concrete LM implementation backed by a provider
pub struct LmClient {
    config: LmConfig,
    provider: Box<dyn Provider>,
}

impl LmClient {
    /// Create a new LM client
    pub fn new(config: LmConfig, provider: Box<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Create with default config
    pub fn with_provider(provider: Box<dyn Provider>) -> Self {
        Self::new(LmConfig::default(), provider)
    }

    /// Get the configuration
    pub fn config(&self) -> &LmConfig {
        &self.config
    }
}

#[async_trait]
impl Lm for LmClient {
    async fn generate(&self, request: ChatRequest<'_>) -> anyhow::Result<LmResponse> {
        self.provider.complete(request, &self.config).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// A mock LM for testing and examples.
///
/// Responds synchronously through a closure, so deterministic behavior
/// (including failures) can be scripted without network access.
pub struct MockLm<F>
where
    F: Fn(&ChatRequest<'_>) -> anyhow::Result<String> + Send + Sync,
{
    respond: F,
    model: String,
}

impl<F> MockLm<F>
where
    F: Fn(&ChatRequest<'_>) -> anyhow::Result<String> + Send + Sync,
{
    /// Create a new mock LM with the given responder
    pub fn new(model: impl Into<String>, respond: F) -> Self {
        Self {
            respond,
            model: model.into(),
        }
    }
}

#[async_trait]
impl<F> Lm for MockLm<F>
where
    F: Fn(&ChatRequest<'_>) -> anyhow::Result<String> + Send + Sync,
{
    async fn generate(&self, request: ChatRequest<'_>) -> anyhow::Result<LmResponse> {
        let text = (self.respond)(&request)?;
        Ok(LmResponse::new(text, self.model.clone()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Message;

    #[tokio::test]
    async fn test_mock_lm_echoes() {
        let lm = MockLm::new("mock", |req| {
            Ok(format!("echo: {}", req.user_content().unwrap_or("")))
        });

        let resp = lm
            .generate(ChatRequest::new().message(Message::user("hi")))
            .await
            .unwrap();

        assert_eq!(resp.text, "echo: hi");
        assert_eq!(lm.model(), "mock");
    }

    #[tokio::test]
    async fn test_mock_lm_failure() {
        let lm = MockLm::new("mock", |_| Err(anyhow::anyhow!("service down")));
        let result = lm.generate(ChatRequest::new()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_config_for_model() {
        let config = LmConfig::for_model("gpt-3.5-turbo");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 4000);
    }
}
