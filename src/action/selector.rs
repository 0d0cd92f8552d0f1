//! Fallback emoji selection via the host's language model.
//!
//! Used when the planner supplied a name that is not in the catalog. The
//! model sees the bot persona, the recent conversation, the planner's
//! reasoning and the target message, and must answer with one catalog name.
//! Exactly one model call per selection; an unusable answer ends the attempt.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::action::ActionInvocation;
use crate::catalog::{self, EmojiId};
use crate::config::{BotConfig, Config};
use crate::host::{HostApi, HostError, history};
use crate::prompt::PromptBuilder;

const SELECT_EMOJI_TEMPLATE: &str = "\
{{name_block}}{{personality}}
你正在qq群里聊天，下面是群里正在聊的内容，其中包含聊天记录和聊天中的图片
其中标注 {{bot_name}}(你) 的发言是你自己的发言，请注意区分:

{{messages}}

你的想法是:{{reasoning}}
你决定对消息 “{{target}}” 贴一个表情。
请你从以下可用的表情中选择一个最合适的表情: {{emojis}}
只需要返回表情的名称，不要进行任何解释或添加其他多余的文字。";

#[derive(Debug, Error)]
enum SelectError {
    #[error("no model configured for task '{0}'")]
    NoModel(String),
    #[error("model call failed: {0}")]
    Model(HostError),
    #[error("host error: {0}")]
    Host(#[from] HostError),
    #[error("model picked an unknown emoji: '{0}'")]
    Unrecognized(String),
}

pub struct EmojiSelector<'a> {
    config: &'a Config,
}

impl<'a> EmojiSelector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Ask the model for a replacement emoji. `None` on any failure; the
    /// reason is logged here.
    pub async fn select(
        &self,
        host: &HostApi,
        invocation: &ActionInvocation,
    ) -> Option<(String, EmojiId)> {
        match self.try_select(host, invocation).await {
            Ok(pick) => Some(pick),
            Err(e @ SelectError::Unrecognized(_)) => {
                warn!(error = %e, "fallback selection unusable");
                None
            }
            Err(e) => {
                error!(error = %e, "fallback selection failed");
                None
            }
        }
    }

    async fn try_select(
        &self,
        host: &HostApi,
        invocation: &ActionInvocation,
    ) -> Result<(String, EmojiId), SelectError> {
        let task = &self.config.react.model_task;
        let model = host
            .available_models()
            .await?
            .remove(task)
            .ok_or_else(|| SelectError::NoModel(task.clone()))?;

        let limit = self.config.react.history_limit;
        let messages = match host.recent_messages(&invocation.chat.chat_id, limit).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(chat_id = %invocation.chat.chat_id, error = %e, "recent messages unavailable, prompting without history");
                Vec::new()
            }
        };
        let rendered = history::render_readable(&messages, &self.config.bot.nickname, Utc::now());

        let prompt = build_prompt(&self.config.bot, &rendered, invocation);
        debug!(model = %model.name, %prompt, "emoji selection prompt");

        let reply = host
            .generate_with_model(&prompt, &model)
            .await
            .map_err(SelectError::Model)?;

        let picked = reply.content.trim();
        match catalog::lookup(picked) {
            Some(id) => {
                debug!(emoji_name = picked, emoji_id = %id, "model picked emoji");
                Ok((picked.to_string(), id))
            }
            None => Err(SelectError::Unrecognized(picked.to_string())),
        }
    }
}

/// Assemble the selection prompt from persona, rendered history and the invocation.
pub fn build_prompt(bot: &BotConfig, messages_text: &str, invocation: &ActionInvocation) -> String {
    let aliases = if bot.alias_names.is_empty() {
        String::new()
    } else {
        format!(",也有人叫你{}", bot.alias_names.join(","))
    };
    let name_block = format!("你的名字是{}{}。", bot.nickname, aliases);
    let emojis = catalog::names_json();

    PromptBuilder::new()
        .append(SELECT_EMOJI_TEMPLATE)
        .with_vars([
            ("name_block", name_block.as_str()),
            ("personality", bot.personality.as_str()),
            ("bot_name", bot.nickname.as_str()),
            ("messages", messages_text),
            ("reasoning", invocation.reasoning.as_str()),
            ("target", invocation.message.processed_plain_text.as_str()),
            ("emojis", emojis.as_str()),
        ])
        .build()
}
