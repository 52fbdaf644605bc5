use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use std::env;

use crate::providers::LLMProvider;

/// OpenAI chat-completions provider.
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl OpenAIProvider {
    /// Create a provider reading the API key from `OPENAI_API_KEY`.
    pub fn new(model: Option<String>, temperature: Option<f32>) -> Result<Self> {
        let api_key =
            env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable not set")?;
        Ok(Self::with_config(api_key, model, temperature))
    }

    /// Create a provider with an explicit API key.
    pub fn with_config(api_key: String, model: Option<String>, temperature: Option<f32>) -> Self {
        Self {
            api_key,
            model: model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: temperature.unwrap_or(0.2),
            client: reqwest::Client::new(),
        }
    }

    /// Set custom base URL (for API-compatible services)
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_chat(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message.to_string(),
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            // No commands can be derived without the model, so this is
            // fatal to the whole run.
            return Err(anyhow!("OpenAI API error: {} - {}", status, body));
        }

        debug!("Raw OpenAI response: {}", body);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_when_config_is_sparse() {
        let provider = OpenAIProvider::with_config("test_key".to_string(), None, None);
        assert_eq!(provider.model_name(), "gpt-4o-mini");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn model_override_wins() {
        let provider = OpenAIProvider::with_config(
            "test_key".to_string(),
            Some("gpt-4.1".to_string()),
            Some(0.0),
        );
        assert_eq!(provider.model_name(), "gpt-4.1");
    }
}
