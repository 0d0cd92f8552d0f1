//! Values exchanged with the host over the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an invocation happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    /// Host stream id; history queries are keyed by it.
    pub chat_id: String,
    pub platform: String,
    /// Set only for group chats.
    pub group_id: Option<String>,
    pub group_name: Option<String>,
}

impl ChatContext {
    pub fn group(chat_id: &str, platform: &str, group_id: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            platform: platform.to_string(),
            group_id: Some(group_id.to_string()),
            group_name: None,
        }
    }

    pub fn private(chat_id: &str, platform: &str) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            platform: platform.to_string(),
            group_id: None,
            group_name: None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }
}

/// The message a reaction is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMessage {
    pub message_id: String,
    /// Plain-text rendering of the message, as the host shows it to the model.
    pub processed_plain_text: String,
}

/// One entry of recent chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub user_id: String,
    pub user_nickname: Option<String>,
    /// Sent by this bot.
    pub is_bot: bool,
    pub text: String,
    pub time: DateTime<Utc>,
}

/// Host-side model description. Opaque to the plugin apart from `name`,
/// which is passed back verbatim when calling the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub extra: serde_json::Value,
}

/// Model reply on a successful `llm/generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmReply {
    pub content: String,
    pub reasoning: Option<String>,
    pub model_name: String,
}

/// Audit entry handed to host storage after an action ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action_id: Uuid,
    pub time: DateTime<Utc>,
    pub chat: ChatContext,
    /// Treat the action as a reply when the host rebuilds prompts.
    pub action_build_into_prompt: bool,
    pub action_prompt_display: String,
    pub action_done: bool,
    pub thinking_id: String,
    pub action_data: serde_json::Map<String, serde_json::Value>,
    pub action_name: String,
}
