// SPDX-License-Identifier: Apache-2.0
//!
//! In-process `tokio::sync::RwLock`-guarded store. No external database
//! dependency; mirrors the preference for embedding storage directly in the
//! binary rather than reaching for an external service.

use std::collections::HashMap;

use actl_a2a::A2aMessage;
use actl_config::{Agent, ModelConfig};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{
    AgentRow, Event, ListEventsOptions, ModelConfigRow, Session, SessionKey, ToolRow,
    ToolServerKey, ToolServerRow,
};
use crate::traits::Store;

fn agent_id(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

#[derive(Default)]
struct Inner {
    agents: HashMap<String, AgentRow>,
    model_configs: HashMap<String, ModelConfigRow>,
    tool_servers: HashMap<ToolServerKey, ToolServerRow>,
    tools: HashMap<ToolServerKey, Vec<ToolRow>>,
    sessions: HashMap<SessionKey, Session>,
    events: HashMap<SessionKey, Vec<Event>>,
}

/// Reference `Store` implementation: an in-memory table set behind a single
/// `RwLock`. Agent/ToolServer writes take the write lock (serialising
/// upserts process-wide); reads take the read lock and never block each
/// other.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn upsert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        let id = agent_id(&agent.reference.namespace, &agent.reference.name);
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let created_at = inner.agents.get(&id).map(|r| r.created_at).unwrap_or(now);
        inner.agents.insert(
            id,
            AgentRow {
                agent,
                created_at,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn get_agent(&self, namespace: &str, name: &str) -> Option<AgentRow> {
        let inner = self.inner.read().await;
        inner.agents.get(&agent_id(namespace, name)).cloned()
    }

    async fn delete_agent(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let id = agent_id(namespace, name);
        let mut inner = self.inner.write().await;
        inner
            .agents
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::AgentNotFound(id))
    }

    async fn list_agents(&self) -> Vec<AgentRow> {
        self.inner.read().await.agents.values().cloned().collect()
    }

    async fn upsert_model_config(&self, model_config: ModelConfig) -> Result<(), StoreError> {
        let id = agent_id(&model_config.reference.namespace, &model_config.reference.name);
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let created_at = inner
            .model_configs
            .get(&id)
            .map(|r| r.created_at)
            .unwrap_or(now);
        inner.model_configs.insert(
            id,
            ModelConfigRow {
                model_config,
                created_at,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn get_model_config(&self, namespace: &str, name: &str) -> Option<ModelConfigRow> {
        let inner = self.inner.read().await;
        inner.model_configs.get(&agent_id(namespace, name)).cloned()
    }

    async fn delete_model_config(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let id = agent_id(namespace, name);
        let mut inner = self.inner.write().await;
        inner
            .model_configs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::ModelConfigNotFound(id))
    }

    async fn list_model_configs(&self) -> Vec<ModelConfigRow> {
        self.inner.read().await.model_configs.values().cloned().collect()
    }

    async fn upsert_tool_server(&self, key: ToolServerKey, url: String) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.tool_servers.insert(
            key.clone(),
            ToolServerRow {
                key,
                url,
                discovered_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_tool_server(&self, key: &ToolServerKey) -> Option<ToolServerRow> {
        self.inner.read().await.tool_servers.get(key).cloned()
    }

    async fn delete_tool_server(&self, key: &ToolServerKey) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.tools.remove(key);
        inner
            .tool_servers
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::ToolServerNotFound(key.namespace.clone(), key.name.clone()))
    }

    async fn list_tool_servers(&self) -> Vec<ToolServerRow> {
        self.inner.read().await.tool_servers.values().cloned().collect()
    }

    async fn refresh_tools_for_server(
        &self,
        server: ToolServerKey,
        tools: Vec<ToolRow>,
    ) -> Result<(), StoreError> {
        // A single write-lock-guarded replace: readers observe either the
        // fully-old or fully-new Vec, never an interleaving.
        let mut inner = self.inner.write().await;
        inner.tools.insert(server, tools);
        Ok(())
    }

    async fn list_tools_for_server(&self, server: &ToolServerKey) -> Vec<ToolRow> {
        self.inner
            .read()
            .await
            .tools
            .get(server)
            .cloned()
            .unwrap_or_default()
    }

    async fn get_or_create_session(
        &self,
        key: SessionKey,
        app_name: &str,
        agent_id: &str,
        name_if_created: &str,
    ) -> Session {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.sessions.get(&key) {
            return existing.clone();
        }
        let session = Session::new(key.clone(), app_name, agent_id, name_if_created, Utc::now());
        inner.sessions.insert(key, session.clone());
        session
    }

    async fn get_session(&self, key: &SessionKey) -> Option<Session> {
        self.inner.read().await.sessions.get(key).cloned()
    }

    async fn append_event(&self, message: A2aMessage, session: SessionKey) -> Result<Event, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&session) {
            return Err(StoreError::SessionNotFound(
                session.user_id.clone(),
                session.context_id.clone(),
            ));
        }
        let ordinal = inner.events.get(&session).map(|v| v.len() as u64).unwrap_or(0);
        let event = Event {
            session: session.clone(),
            ordinal,
            message,
            timestamp: Utc::now(),
        };
        inner.events.entry(session).or_default().push(event.clone());
        Ok(event)
    }

    async fn list_events_for_session(
        &self,
        session: &SessionKey,
        options: ListEventsOptions,
    ) -> Vec<Event> {
        let inner = self.inner.read().await;
        let mut events = inner.events.get(session).cloned().unwrap_or_default();
        if !options.order_asc {
            events.reverse();
        }
        if let Some(limit) = options.limit {
            events.truncate(limit);
        }
        events
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
