//! Actions: units of work the host planner can choose for a message.
//!
//! [`Action`] is the extension trait: each action is a `Send + Sync` struct
//! listed in a plugin's component table and keyed by [`ActionInfo::name`].
//! The only action here is [`react::MessageReactAction`].

pub mod react;
pub mod selector;

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::host::{ChatContext, HostApi, TargetMessage};

/// When the host planner may consider an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationType {
    /// Offered to the planner on every message.
    Always,
    Never,
}

/// What the host registry and planner see of an action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionInfo {
    pub name: String,
    pub description: String,
    pub activation_type: ActivationType,
    /// Natural-language hints for when to pick this action.
    pub action_require: Vec<String>,
    pub associated_types: Vec<String>,
    /// Parameter name → description. All listed parameters are required.
    pub action_parameters: BTreeMap<String, String>,
    /// May run alongside other actions chosen for the same message.
    pub parallel_action: bool,
}

/// One request to run an action, built by the host per planner decision.
#[derive(Debug, Clone)]
pub struct ActionInvocation {
    pub chat: ChatContext,
    pub message: TargetMessage,
    /// Raw parameters chosen by the planner.
    pub action_data: serde_json::Map<String, serde_json::Value>,
    pub reasoning: String,
    pub thinking_id: String,
}

impl ActionInvocation {
    /// String parameter by name; missing or non-string values read as `""`.
    pub fn param_str(&self, key: &str) -> &str {
        self.action_data
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
    }
}

/// `(success, description)` returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self { success, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }
}

/// An action loaded from a plugin.
///
/// Implementations must not block the caller: the work runs in a spawned
/// task and the outcome is delivered through `reply_tx`.
pub trait Action: Send + Sync {
    fn info(&self) -> &ActionInfo;

    fn name(&self) -> &str {
        &self.info().name
    }

    fn execute(
        &self,
        invocation: ActionInvocation,
        host: HostApi,
        reply_tx: oneshot::Sender<ActionOutcome>,
    );
}
