//! Plugin registration: what the host enumerates at load time.
//!
//! [`plugins`] is the table the host calls: it returns every plugin this
//! crate provides, already configured. Each [`Plugin`] reports its manifest
//! and hands over its actions. [`ActionRegistry`] is the host-side table
//! those actions land in; it routes invocations by action name.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::action::react::MessageReactAction;
use crate::action::{Action, ActionInfo, ActionInvocation, ActionOutcome};
use crate::config::{Config, DEFAULT_ACTION_REQUIRE};
use crate::error::AppError;
use crate::host::HostApi;

pub const PLUGIN_NAME: &str = "msg_react_plugin";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// One user-editable setting, as shown in the host's config UI.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigField {
    #[serde(rename = "type")]
    pub field_type: String,
    pub input_type: String,
    pub default: String,
    pub description: String,
}

/// Plugin manifest.
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub plugin_name: String,
    pub enable_plugin: bool,
    pub dependencies: Vec<String>,
    pub config_file_name: String,
    pub config_section_descriptions: BTreeMap<String, String>,
    /// section → key → field.
    pub config_schema: BTreeMap<String, BTreeMap<String, ConfigField>>,
}

pub trait Plugin: Send + Sync {
    fn info(&self) -> PluginInfo;

    /// Actions this plugin contributes.
    fn components(&self) -> Vec<Box<dyn Action>>;
}

pub struct MsgReactPlugin {
    config: Arc<Config>,
}

impl MsgReactPlugin {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

impl Plugin for MsgReactPlugin {
    fn info(&self) -> PluginInfo {
        let action_require = ConfigField {
            field_type: "str".to_string(),
            input_type: "textarea".to_string(),
            default: DEFAULT_ACTION_REQUIRE.join("\n"),
            description: "贴表情动作决策prompt".to_string(),
        };

        PluginInfo {
            plugin_name: PLUGIN_NAME.to_string(),
            enable_plugin: self.config.enabled,
            dependencies: Vec::new(),
            config_file_name: CONFIG_FILE_NAME.to_string(),
            config_section_descriptions: BTreeMap::from([(
                PLUGIN_NAME.to_string(),
                "消息贴表情配置".to_string(),
            )]),
            config_schema: BTreeMap::from([(
                PLUGIN_NAME.to_string(),
                BTreeMap::from([("action_require".to_string(), action_require)]),
            )]),
        }
    }

    fn components(&self) -> Vec<Box<dyn Action>> {
        vec![Box::new(MessageReactAction::new(Arc::clone(&self.config)))]
    }
}

/// Every plugin in this crate, configured from `config`.
pub fn plugins(config: Arc<Config>) -> Vec<Box<dyn Plugin>> {
    vec![Box::new(MsgReactPlugin::new(config))]
}

/// Plugin manifest plus its actions, as printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub plugin: PluginInfo,
    pub actions: Vec<ActionInfo>,
}

pub fn manifest(plugin: &dyn Plugin) -> Manifest {
    Manifest {
        plugin: plugin.info(),
        actions: plugin.components().iter().map(|a| a.info().clone()).collect(),
    }
}

/// Name-keyed action table.
pub struct ActionRegistry {
    host: HostApi,
    actions: HashMap<String, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn new(host: HostApi) -> Self {
        Self {
            host,
            actions: HashMap::new(),
        }
    }

    /// Add a plugin's actions. Disabled plugins contribute nothing.
    /// Action names must be unique across all registered plugins.
    pub fn register(&mut self, plugin: &dyn Plugin) -> Result<(), AppError> {
        let plugin_info = plugin.info();
        if !plugin_info.enable_plugin {
            info!(plugin = %plugin_info.plugin_name, "plugin disabled, skipping its actions");
            return Ok(());
        }

        for action in plugin.components() {
            let name = action.name().to_string();
            if self.actions.contains_key(&name) {
                return Err(AppError::Plugin(format!(
                    "duplicate action '{name}' from plugin '{}'",
                    plugin_info.plugin_name
                )));
            }
            debug!(plugin = %plugin_info.plugin_name, action = %name, "action registered");
            self.actions.insert(name, action);
        }
        Ok(())
    }

    /// Registered action infos, sorted by name.
    pub fn infos(&self) -> Vec<&ActionInfo> {
        let mut infos: Vec<&ActionInfo> = self.actions.values().map(|a| a.info()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Start `name` and return the slot its outcome arrives in. Never blocks.
    pub fn dispatch(
        &self,
        name: &str,
        invocation: ActionInvocation,
    ) -> Result<oneshot::Receiver<ActionOutcome>, AppError> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| AppError::Plugin(format!("action not found: {name}")))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        action.execute(invocation, self.host.clone(), reply_tx);
        Ok(reply_rx)
    }

    /// Dispatch and wait for the outcome.
    pub async fn invoke(
        &self,
        name: &str,
        invocation: ActionInvocation,
    ) -> Result<ActionOutcome, AppError> {
        self.dispatch(name, invocation)?
            .await
            .map_err(|_| AppError::Plugin(format!("action '{name}' dropped its reply")))
    }
}
