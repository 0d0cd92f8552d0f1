//! Host capability surface.
//!
//! [`HostApi`] wraps the raw [`HostHandle`] and exposes one typed method per
//! host service the plugin uses. Actions never address bus methods directly.

pub mod bus;
pub mod history;
pub mod types;

use std::collections::HashMap;

use tracing::debug;

pub use bus::{HostBus, HostError, HostHandle, HostPayload, HostRequest, HostResult};
pub use types::{ActionRecord, ChatContext, ChatMessage, LlmReply, ModelConfig, TargetMessage};

use bus::{
    ERR_UNEXPECTED_PAYLOAD, METHOD_COMMAND, METHOD_GENERATE, METHOD_MODELS,
    METHOD_RECENT_MESSAGES, METHOD_STORE_ACTION,
};

#[derive(Debug, Clone)]
pub struct HostApi {
    bus: HostHandle,
}

impl HostApi {
    pub fn new(bus: HostHandle) -> Self {
        Self { bus }
    }

    /// Send a platform command and return the host's completion flag.
    pub async fn send_command(
        &self,
        name: &str,
        args: serde_json::Value,
        display_message: &str,
        wait_for_completion: bool,
    ) -> Result<bool, HostError> {
        debug!(command = name, %args, "sending host command");
        let payload = HostPayload::Command {
            name: name.to_string(),
            args,
            display_message: display_message.to_string(),
            wait_for_completion,
        };
        match self.bus.request(METHOD_COMMAND, payload).await? {
            HostPayload::CommandAck { completed } => Ok(completed),
            other => Err(unexpected(METHOD_COMMAND, &other)),
        }
    }

    pub async fn store_action_info(&self, record: ActionRecord) -> Result<(), HostError> {
        match self
            .bus
            .request(METHOD_STORE_ACTION, HostPayload::StoreActionInfo(record))
            .await?
        {
            HostPayload::Ack => Ok(()),
            other => Err(unexpected(METHOD_STORE_ACTION, &other)),
        }
    }

    /// The last `limit` messages of `chat_id`.
    pub async fn recent_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, HostError> {
        let payload = HostPayload::RecentMessages {
            chat_id: chat_id.to_string(),
            limit,
        };
        match self.bus.request(METHOD_RECENT_MESSAGES, payload).await? {
            HostPayload::Messages(messages) => Ok(messages),
            other => Err(unexpected(METHOD_RECENT_MESSAGES, &other)),
        }
    }

    /// Models the host has configured, keyed by task name.
    pub async fn available_models(&self) -> Result<HashMap<String, ModelConfig>, HostError> {
        match self.bus.request(METHOD_MODELS, HostPayload::ModelsQuery).await? {
            HostPayload::Models(models) => Ok(models),
            other => Err(unexpected(METHOD_MODELS, &other)),
        }
    }

    /// One completion with an explicit model. A failed call comes back as `Err`.
    pub async fn generate_with_model(
        &self,
        prompt: &str,
        model: &ModelConfig,
    ) -> Result<LlmReply, HostError> {
        let payload = HostPayload::LlmRequest {
            prompt: prompt.to_string(),
            model: model.clone(),
        };
        match self.bus.request(METHOD_GENERATE, payload).await? {
            HostPayload::LlmResponse { content, reasoning, model_name } => Ok(LlmReply {
                content,
                reasoning,
                model_name,
            }),
            other => Err(unexpected(METHOD_GENERATE, &other)),
        }
    }
}

fn unexpected(method: &str, payload: &HostPayload) -> HostError {
    HostError::new(
        ERR_UNEXPECTED_PAYLOAD,
        format!("unexpected reply to {method}: {payload:?}"),
    )
}
