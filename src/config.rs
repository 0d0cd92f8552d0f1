//! Configuration loading with env-var overrides.
//!
//! Reads the plugin TOML (default `config/default.toml`, or the path in
//! `MSG_REACT_CONFIG`), then applies the `MSG_REACT_LOG_LEVEL` override.
//! The file is parsed into raw `serde` shapes first and resolved into
//! [`Config`] afterwards, so defaults live in one place.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Built-in "when to use this action" hints, used unless the config overrides them.
pub const DEFAULT_ACTION_REQUIRE: &[&str] = &[
    "想针对某条消息表达情绪时",
    "想对某条消息做出反应但又不想直接reply或emoji时",
    "别人让你贴表情时",
    "注意: msg_react action不视为回复消息,使用该动作不影响回复频率。你可以同时使用msg_react和任何其他动作。",
];

const DEFAULT_HISTORY_LIMIT: usize = 15;
const DEFAULT_MODEL_TASK: &str = "tool_use";

/// Bot persona, used by the fallback prompt.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub nickname: String,
    /// Other names group members use for the bot.
    pub alias_names: Vec<String>,
    pub personality: String,
}

/// `[msg_react_plugin]` section, resolved.
#[derive(Debug, Clone)]
pub struct ReactConfig {
    /// Trigger hints shown to the planner, one per line in the TOML.
    pub action_require: Vec<String>,
    /// How many recent messages the fallback prompt includes.
    pub history_limit: usize,
    /// Host model task key used for the fallback call.
    pub model_task: String,
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            action_require: default_action_require(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            model_task: DEFAULT_MODEL_TASK.to_string(),
        }
    }
}

/// Fully-resolved plugin configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `false` keeps the plugin registered but refuses to dispatch its actions.
    pub enabled: bool,
    pub log_level: String,
    pub bot: BotConfig,
    pub react: ReactConfig,
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    plugin: RawPlugin,
    bot: RawBot,
    #[serde(default)]
    personality: RawPersonality,
    #[serde(default)]
    msg_react_plugin: RawMsgReact,
}

#[derive(Deserialize)]
struct RawPlugin {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawPlugin {
    fn default() -> Self {
        Self { enabled: true, log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawBot {
    nickname: String,
    #[serde(default)]
    alias_names: Vec<String>,
}

#[derive(Deserialize, Default)]
struct RawPersonality {
    #[serde(default)]
    personality: String,
}

#[derive(Deserialize, Default)]
struct RawMsgReact {
    /// Newline-delimited hints; absent or blank keeps the built-in list.
    #[serde(default)]
    action_require: Option<String>,
    #[serde(default)]
    history_limit: Option<usize>,
    #[serde(default)]
    model_task: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_action_require() -> Vec<String> {
    DEFAULT_ACTION_REQUIRE.iter().map(|s| s.to_string()).collect()
}

/// Split a textarea value into hints. Blank lines are dropped; an all-blank
/// value yields `None` so the caller keeps its defaults.
pub fn parse_action_require(raw: &str) -> Option<Vec<String>> {
    let hints: Vec<String> = raw
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    if hints.is_empty() { None } else { Some(hints) }
}

/// Load config, then apply env-var overrides.
///
/// Path precedence: `config_path` argument, then `MSG_REACT_CONFIG`, then
/// [`DEFAULT_CONFIG_PATH`].
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let env_path = env::var("MSG_REACT_CONFIG").ok();
    let path = config_path
        .or(env_path.as_deref())
        .unwrap_or(DEFAULT_CONFIG_PATH);
    let log_level_override = env::var("MSG_REACT_LOG_LEVEL").ok();
    load_from(&expand_home(path), log_level_override.as_deref())
}

/// Loader with an explicit path and optional override.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: &Path, log_level_override: Option<&str>) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let react = parsed.msg_react_plugin;
    let history_limit = react.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if history_limit == 0 {
        return Err(AppError::Config(format!(
            "msg_react_plugin.history_limit must be > 0 in {}",
            path.display()
        )));
    }
    let model_task = react
        .model_task
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL_TASK.to_string());
    let action_require = react
        .action_require
        .as_deref()
        .and_then(parse_action_require)
        .unwrap_or_else(default_action_require);

    Ok(Config {
        enabled: parsed.plugin.enabled,
        log_level: log_level_override
            .unwrap_or(&parsed.plugin.log_level)
            .to_string(),
        bot: BotConfig {
            nickname: parsed.bot.nickname,
            alias_names: parsed.bot.alias_names,
            personality: parsed.personality.personality,
        },
        react: ReactConfig {
            action_require,
            history_limit,
            model_task,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

impl Config {
    /// In-memory config for tests and embedding hosts.
    pub fn with_bot(nickname: &str, alias_names: &[&str], personality: &str) -> Self {
        Self {
            enabled: true,
            log_level: default_log_level(),
            bot: BotConfig {
                nickname: nickname.to_string(),
                alias_names: alias_names.iter().map(|s| s.to_string()).collect(),
                personality: personality.to_string(),
            },
            react: ReactConfig::default(),
        }
    }
}
