// SPDX-License-Identifier: Apache-2.0
//!
//! The abstract store seam. The reconciler (C10) and executor (C7) depend
//! only on this trait; the in-memory implementation in [`crate::memory`] is
//! one of potentially several backings, not the contract itself.

use actl_a2a::A2aMessage;
use actl_config::{Agent, ModelConfig};
use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{
    AgentRow, Event, ListEventsOptions, ModelConfigRow, Session, SessionKey, ToolRow,
    ToolServerKey, ToolServerRow,
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn upsert_agent(&self, agent: Agent) -> Result<(), StoreError>;
    async fn get_agent(&self, namespace: &str, name: &str) -> Option<AgentRow>;
    async fn delete_agent(&self, namespace: &str, name: &str) -> Result<(), StoreError>;
    async fn list_agents(&self) -> Vec<AgentRow>;

    async fn upsert_model_config(&self, model_config: ModelConfig) -> Result<(), StoreError>;
    async fn get_model_config(&self, namespace: &str, name: &str) -> Option<ModelConfigRow>;
    async fn delete_model_config(&self, namespace: &str, name: &str) -> Result<(), StoreError>;
    async fn list_model_configs(&self) -> Vec<ModelConfigRow>;

    async fn upsert_tool_server(&self, key: ToolServerKey, url: String) -> Result<(), StoreError>;
    async fn get_tool_server(&self, key: &ToolServerKey) -> Option<ToolServerRow>;
    async fn delete_tool_server(&self, key: &ToolServerKey) -> Result<(), StoreError>;
    async fn list_tool_servers(&self) -> Vec<ToolServerRow>;

    /// Atomically replace the full tool list for a server. Concurrent readers
    /// observe either the complete old list or the complete new one, never a
    /// partial mix.
    async fn refresh_tools_for_server(
        &self,
        server: ToolServerKey,
        tools: Vec<ToolRow>,
    ) -> Result<(), StoreError>;
    async fn list_tools_for_server(&self, server: &ToolServerKey) -> Vec<ToolRow>;

    /// Return the existing session for `key`, or create one named
    /// `name_if_created` if none exists yet. The caller (Session Manager,
    /// C6) is responsible for deriving that name; the store never inspects
    /// message content.
    async fn get_or_create_session(
        &self,
        key: SessionKey,
        app_name: &str,
        agent_id: &str,
        name_if_created: &str,
    ) -> Session;

    async fn get_session(&self, key: &SessionKey) -> Option<Session>;

    async fn append_event(&self, message: A2aMessage, session: SessionKey) -> Result<Event, StoreError>;
    async fn list_events_for_session(
        &self,
        session: &SessionKey,
        options: ListEventsOptions,
    ) -> Vec<Event>;
}
