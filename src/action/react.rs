//! `msg_react`: attach a catalog emoji to a group-chat message.
//!
//! Resolution order: the planner's `emoji_name`, then one model-backed
//! fallback via [`EmojiSelector`]. A resolved emoji is sent as a single
//! `SET_MSG_EMOJI_LIKE` command. Every invocation that reaches resolution
//! leaves exactly one audit record in host storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::selector::EmojiSelector;
use super::{Action, ActionInfo, ActionInvocation, ActionOutcome, ActivationType};
use crate::catalog;
use crate::config::Config;
use crate::host::{ActionRecord, HostApi};

pub const ACTION_NAME: &str = "msg_react";
pub const COMMAND_SET_EMOJI_LIKE: &str = "SET_MSG_EMOJI_LIKE";
pub const PARAM_EMOJI_NAME: &str = "emoji_name";

pub const MSG_GROUP_ONLY: &str = "只有群聊才能贴表情！";
pub const MSG_UNRESOLVED: &str = "选择的表情无法识别，贴表情失败！";

pub struct MessageReactAction {
    info: ActionInfo,
    config: Arc<Config>,
}

impl MessageReactAction {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            info: action_info(&config),
            config,
        }
    }

    /// Run the action inline and return its outcome.
    pub async fn run(&self, invocation: ActionInvocation, host: &HostApi) -> ActionOutcome {
        react(&self.config, invocation, host).await
    }
}

impl Action for MessageReactAction {
    fn info(&self) -> &ActionInfo {
        &self.info
    }

    fn execute(
        &self,
        invocation: ActionInvocation,
        host: HostApi,
        reply_tx: oneshot::Sender<ActionOutcome>,
    ) {
        let config = Arc::clone(&self.config);
        // Spawn so the caller is not blocked on the transport or model round-trip.
        tokio::spawn(async move {
            let outcome = react(&config, invocation, &host).await;
            let _ = reply_tx.send(outcome);
        });
    }
}

/// Registry entry for `msg_react`, built from the resolved config.
pub fn action_info(config: &Config) -> ActionInfo {
    let description = format!(
        "向指定群聊消息“贴表情”（添加 reaction），表情会显示在对应消息的下面，用于对已有消息做轻量反馈或情绪表达。\
         这个动作不会发送消息内容，仅会有一个弱提示。\
         你能且**只能**从下列表情列表中选择1个表情放到{PARAM_EMOJI_NAME}参数中: {}",
        catalog::names_json()
    );

    ActionInfo {
        name: ACTION_NAME.to_string(),
        description,
        activation_type: if config.enabled {
            ActivationType::Always
        } else {
            ActivationType::Never
        },
        action_require: config.react.action_require.clone(),
        associated_types: vec!["text".to_string(), "emoji".to_string()],
        action_parameters: BTreeMap::from([(
            PARAM_EMOJI_NAME.to_string(),
            "必填参数，要贴的表情名称".to_string(),
        )]),
        parallel_action: true,
    }
}

async fn react(config: &Config, invocation: ActionInvocation, host: &HostApi) -> ActionOutcome {
    if !invocation.chat.is_group() {
        return ActionOutcome::failed(MSG_GROUP_ONLY);
    }

    let requested = invocation.param_str(PARAM_EMOJI_NAME);
    let resolved = match catalog::lookup(requested) {
        Some(id) => Some((requested.to_string(), id)),
        None => {
            warn!(emoji_name = requested, "unrecognised emoji name, asking the model to pick one");
            EmojiSelector::new(config).select(host, &invocation).await
        }
    };

    let Some((emoji_name, emoji_id)) = resolved else {
        error!(emoji_name = requested, "emoji unresolved after fallback");
        let display = format!("[贴表情失败：无法识别表情“{requested}”]");
        audit(host, &invocation, display, false).await;
        return ActionOutcome::failed(MSG_UNRESOLVED);
    };

    let target_text = &invocation.message.processed_plain_text;
    let args = json!({
        "message_id": invocation.message.message_id,
        "emoji_id": emoji_id,
    });
    let display = format!("[贴表情消息：贴在了消息“{target_text}”上，表情是={emoji_name}]");
    debug!(%args, "reaction command args");

    let completed = match host
        .send_command(COMMAND_SET_EMOJI_LIKE, args, &display, true)
        .await
    {
        Ok(flag) => flag,
        Err(e) => {
            error!(error = %e, "reaction command failed");
            false
        }
    };

    audit(host, &invocation, display, completed).await;

    if completed {
        info!(emoji_name = %emoji_name, emoji_id = %emoji_id, message_id = %invocation.message.message_id, "reaction sent");
        ActionOutcome::new(
            true,
            format!("贴表情成功: 贴在了消息“{target_text}”上，表情是={emoji_name}"),
        )
    } else {
        warn!(emoji_name = %emoji_name, message_id = %invocation.message.message_id, "reaction command did not complete");
        ActionOutcome::failed(format!(
            "贴表情失败: 贴在了消息“{target_text}”上，表情是={emoji_name}"
        ))
    }
}

/// Record the action in host storage. Storage failures are logged only.
async fn audit(host: &HostApi, invocation: &ActionInvocation, display: String, done: bool) {
    let record = ActionRecord {
        action_id: Uuid::now_v7(),
        time: Utc::now(),
        chat: invocation.chat.clone(),
        action_build_into_prompt: true,
        action_prompt_display: display,
        action_done: done,
        thinking_id: invocation.thinking_id.clone(),
        action_data: invocation.action_data.clone(),
        action_name: ACTION_NAME.to_string(),
    };
    if let Err(e) = host.store_action_info(record).await {
        warn!(error = %e, "failed to store action record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lists_catalog_and_parameters() {
        let config = Config::with_bot("小助手", &[], "");
        let info = action_info(&config);
        assert_eq!(info.name, "msg_react");
        assert_eq!(info.activation_type, ActivationType::Always);
        assert!(info.parallel_action);
        assert!(info.description.contains(&catalog::names_json()));
        assert!(info.description.contains("emoji_name参数"));
        assert_eq!(info.associated_types, vec!["text", "emoji"]);
        assert_eq!(
            info.action_parameters.get("emoji_name").map(String::as_str),
            Some("必填参数，要贴的表情名称")
        );
        assert_eq!(info.action_require.len(), 4);
    }

    #[test]
    fn disabled_plugin_is_never_activated() {
        let mut config = Config::with_bot("小助手", &[], "");
        config.enabled = false;
        assert_eq!(action_info(&config).activation_type, ActivationType::Never);
    }

    #[test]
    fn action_name_comes_from_info() {
        let action = MessageReactAction::new(Arc::new(Config::with_bot("小助手", &[], "")));
        assert_eq!(action.name(), ACTION_NAME);
    }
}
