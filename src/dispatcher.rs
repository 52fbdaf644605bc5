use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::{error, info};
use serde_json::{Map, Value};

use crate::command::{self, SchemaError};

/// Outcome of dispatching one command, in extraction order.
#[derive(Debug, Clone)]
pub enum DispatchResult {
    /// Backend accepted the command; carries the opaque response body.
    Sent { action: String, response: String },
    /// Payload failed schema validation; no call was made.
    ValidationFailed { action: String, error: SchemaError },
    /// Call was attempted but failed (network error or non-success status).
    TransportFailed { action: String, reason: String },
}

/// Seam between the dispatcher and the garden-management backend.
#[async_trait]
pub trait BackendTransport: Send + Sync {
    /// Submit one command body under the given action. A non-success
    /// status is an error, same as a network failure.
    async fn post_command(&self, action: &str, body: &Value) -> Result<String>;
}

/// Reqwest-backed transport posting to `{base_url}/beds/{bed_id}/{action}`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    bed_id: String,
}

impl HttpBackend {
    pub fn new(base_url: String, bed_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bed_id,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/beds/{}/{}", self.base_url, self.bed_id, action)
    }
}

#[async_trait]
impl BackendTransport for HttpBackend {
    async fn post_command(&self, action: &str, body: &Value) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to reach backend for `{}`", action))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow!("backend error for `{}`: {} - {}", action, status, text));
        }
        Ok(text)
    }
}

/// Validates extracted commands and submits them one at a time.
pub struct Dispatcher {
    transport: Box<dyn BackendTransport>,
}

impl Dispatcher {
    pub fn new(transport: Box<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// Dispatch every extracted command in order, one outbound call each.
    ///
    /// Commands are independent: a validation or transport failure is
    /// recorded and the remaining commands are still attempted. Nothing
    /// is retried and nothing rolls back.
    pub async fn dispatch(&self, commands: Map<String, Value>) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(commands.len());
        for (action, payload) in commands {
            results.push(self.dispatch_one(action, payload).await);
        }
        results
    }

    async fn dispatch_one(&self, action: String, payload: Value) -> DispatchResult {
        let command = match command::validate(&action, &payload) {
            Ok(command) => command,
            Err(err) => {
                error!("Rejected `{}` command: {}", action, err);
                return DispatchResult::ValidationFailed { action, error: err };
            }
        };

        let body = match serde_json::to_value(&command) {
            Ok(body) => body,
            Err(err) => {
                // Serializing a validated command should not fail; surface
                // it as a transport-level failure rather than panicking.
                error!("Could not encode `{}` command: {}", action, err);
                return DispatchResult::TransportFailed {
                    action,
                    reason: format!("failed to encode command body: {}", err),
                };
            }
        };

        match self.transport.post_command(&action, &body).await {
            Ok(response) => {
                info!("Backend accepted `{}`", action);
                DispatchResult::Sent { action, response }
            }
            Err(err) => {
                error!("Backend call for `{}` failed: {:#}", action, err);
                DispatchResult::TransportFailed {
                    action,
                    reason: format!("{:#}", err),
                }
            }
        }
    }
}
