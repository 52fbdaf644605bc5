use anyhow::Result;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAIProvider;

/// Trait representing a language-model provider.
///
/// `send_chat` returns the provider's raw response body; unwrapping the
/// choice/message/content structure is the extractor's job so that parse
/// failures stay distinguishable from transport failures.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Name of the provider.
    fn name(&self) -> &str;

    /// Model name of the provider.
    fn model_name(&self) -> &str {
        "unknown"
    }

    /// Send a system prompt plus user message and return the raw body.
    async fn send_chat(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}
