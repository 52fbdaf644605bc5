use anyhow::Result;
use log::{info, warn};

use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::extractor;
use crate::prompt;
use crate::providers::LLMProvider;

/// One sequential instruction-to-backend run.
///
/// The language-model call blocks first; each backend call then runs one at
/// a time in extraction order. A provider failure aborts the run, while
/// extraction and per-command failures are logged and contained.
pub struct Pipeline<'a> {
    provider: &'a dyn LLMProvider,
    dispatcher: &'a Dispatcher,
}

impl<'a> Pipeline<'a> {
    pub fn new(provider: &'a dyn LLMProvider, dispatcher: &'a Dispatcher) -> Self {
        Self {
            provider,
            dispatcher,
        }
    }

    /// Translate one free-text instruction and dispatch the result.
    pub async fn run(&self, instruction: &str) -> Result<Vec<DispatchResult>> {
        info!(
            "Translating instruction via {} ({})",
            self.provider.name(),
            self.provider.model_name()
        );
        let raw = self
            .provider
            .send_chat(&prompt::system_prompt(), instruction)
            .await?;

        let commands = match extractor::extract(&raw) {
            Ok(commands) => commands,
            Err(err) => {
                // Fail soft: a response we cannot parse means zero commands,
                // not a failed run.
                warn!("Could not extract commands from response: {}", err);
                return Ok(Vec::new());
            }
        };

        if commands.is_empty() {
            info!("Model returned no commands for this instruction");
            return Ok(Vec::new());
        }

        info!("Dispatching {} command(s)", commands.len());
        Ok(self.dispatcher.dispatch(commands).await)
    }
}
