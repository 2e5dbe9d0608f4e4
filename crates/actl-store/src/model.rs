// SPDX-License-Identifier: Apache-2.0
//!
//! Row types persisted by the store. These wrap the declarative resource
//! types from `actl-config` with the bookkeeping fields the store itself
//! owns (timestamps, discovered tool lists, session state).

use std::collections::HashMap;

use actl_a2a::A2aMessage;
use actl_config::{Agent, ModelConfig, ToolServerKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRow {
    pub agent: Agent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfigRow {
    pub model_config: ModelConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity of a tool server: its resource reference plus which kind of
/// resource it was discovered from (`MCPServer`, `RemoteMCPServer`, or a
/// plain MCP-annotated `Service`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolServerKey {
    pub namespace: String,
    pub name: String,
    pub kind: ToolServerKind,
}

impl ToolServerKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ToolServerKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerRow {
    pub key: ToolServerKey,
    pub url: String,
    pub discovered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRow {
    pub server: ToolServerKey,
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Identity of a conversation session: one per (user, context).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub context_id: String,
}

impl SessionKey {
    pub fn new(user_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            context_id: context_id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    pub app_name: String,
    pub agent_id: String,
    pub name: String,
    #[serde(default)]
    pub state: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(key: SessionKey, app_name: impl Into<String>, agent_id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            key,
            app_name: app_name.into(),
            agent_id: agent_id.into(),
            name: name.into(),
            state: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A persisted event: one A2A wire message plus its position in the
/// session's ordinal sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub session: SessionKey,
    pub ordinal: u64,
    pub message: A2aMessage,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct ListEventsOptions {
    pub limit: Option<usize>,
    pub order_asc: bool,
}

impl Default for ListEventsOptions {
    fn default() -> Self {
        Self {
            limit: None,
            order_asc: true,
        }
    }
}
