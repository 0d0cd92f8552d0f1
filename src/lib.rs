//! Message reaction plugin.
//!
//! Registers the `msg_react` action with a chat-bot host. The action picks
//! an emoji from a fixed catalog (asking the host's model when the planner's
//! choice is unknown) and attaches it to a group-chat message through the
//! host transport. All host services are reached over [`host::HostBus`].

pub mod action;
pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod logger;
pub mod plugin;
pub mod prompt;
