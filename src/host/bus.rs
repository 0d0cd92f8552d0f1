//! Host bus: request/reply channel between the plugin and its host.
//!
//! The plugin sends [`HostRequest`]s; the host drains [`HostBus::rx`] and
//! answers each one through its `reply_tx`. Method strings follow the
//! `"subsystem/operation"` form (`"llm/generate"`, `"transport/command"`).

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::types::{ActionRecord, ChatMessage, ModelConfig};

pub const METHOD_COMMAND: &str = "transport/command";
pub const METHOD_STORE_ACTION: &str = "storage/action_info";
pub const METHOD_RECENT_MESSAGES: &str = "messages/recent";
pub const METHOD_MODELS: &str = "llm/models";
pub const METHOD_GENERATE: &str = "llm/generate";

/// Generic host-side failure (model call failed, storage rejected, ...).
pub const ERR_HOST: i32 = -32000;
/// Host went away or dropped the reply slot.
pub const ERR_BUS_CLOSED: i32 = -32001;
/// Host answered with a payload the method does not produce.
pub const ERR_UNEXPECTED_PAYLOAD: i32 = -32002;
pub const ERR_METHOD_NOT_FOUND: i32 = -32601;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host error {code}: {message}")]
pub struct HostError {
    pub code: i32,
    pub message: String,
}

impl HostError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub enum HostPayload {
    /// Platform command, e.g. `SET_MSG_EMOJI_LIKE`.
    Command {
        name: String,
        args: serde_json::Value,
        /// Text the host shows in its own history for this command.
        display_message: String,
        wait_for_completion: bool,
    },
    CommandAck { completed: bool },
    StoreActionInfo(ActionRecord),
    Ack,
    RecentMessages { chat_id: String, limit: usize },
    Messages(Vec<ChatMessage>),
    ModelsQuery,
    /// Task name (e.g. `"tool_use"`) → model.
    Models(HashMap<String, ModelConfig>),
    LlmRequest { prompt: String, model: ModelConfig },
    LlmResponse {
        content: String,
        reasoning: Option<String>,
        model_name: String,
    },
}

pub type HostResult = Result<HostPayload, HostError>;

pub struct HostRequest {
    pub method: String,
    pub payload: HostPayload,
    /// The host answers through this sender.
    pub reply_tx: oneshot::Sender<HostResult>,
}

/// Cloneable sending side, held by the plugin.
#[derive(Debug, Clone)]
pub struct HostHandle {
    tx: mpsc::Sender<HostRequest>,
}

impl HostHandle {
    /// Send a request and wait for the host's answer.
    pub async fn request(&self, method: &str, payload: HostPayload) -> HostResult {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(HostRequest {
                method: method.to_string(),
                payload,
                reply_tx,
            })
            .await
            .map_err(|_| HostError::new(ERR_BUS_CLOSED, "host bus closed"))?;

        reply_rx
            .await
            .map_err(|_| HostError::new(ERR_BUS_CLOSED, format!("host dropped reply for {method}")))?
    }
}

/// Owns the host-side receiver plus the handle to give to the plugin.
pub struct HostBus {
    pub rx: mpsc::Receiver<HostRequest>,
    pub handle: HostHandle,
}

impl HostBus {
    pub fn new(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer);
        Self { rx, handle: HostHandle { tx } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn request_round_trip() {
        let HostBus { mut rx, handle } = HostBus::new(4);
        tokio::spawn(async move {
            while let Some(req) = rx.recv().await {
                let reply = match req.payload {
                    HostPayload::ModelsQuery => Ok(HostPayload::Models(HashMap::new())),
                    _ => Err(HostError::new(ERR_METHOD_NOT_FOUND, req.method)),
                };
                let _ = req.reply_tx.send(reply);
            }
        });

        assert!(matches!(
            handle.request(METHOD_MODELS, HostPayload::ModelsQuery).await,
            Ok(HostPayload::Models(m)) if m.is_empty()
        ));
        let err = handle
            .request("nope/x", HostPayload::Ack)
            .await
            .unwrap_err();
        assert_eq!(err.code, ERR_METHOD_NOT_FOUND);
        assert_eq!(err.message, "nope/x");
    }

    #[tokio::test]
    async fn closed_bus_reports_error() {
        let HostBus { rx, handle } = HostBus::new(1);
        drop(rx);
        let err = handle.request(METHOD_MODELS, HostPayload::ModelsQuery).await.unwrap_err();
        assert_eq!(err.code, ERR_BUS_CLOSED);
    }

    #[tokio::test]
    async fn dropped_reply_reports_error() {
        let HostBus { mut rx, handle } = HostBus::new(1);
        tokio::spawn(async move {
            // Receive and drop without answering.
            let _ = rx.recv().await;
        });
        let err = handle.request(METHOD_MODELS, HostPayload::ModelsQuery).await.unwrap_err();
        assert_eq!(err.code, ERR_BUS_CLOSED);
        assert!(err.message.contains(METHOD_MODELS));
    }
}
